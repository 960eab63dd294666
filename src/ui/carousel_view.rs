// Auto-scrolling video carousel widget
// Horizontal strip of VideoTiles inside an external-policy ScrolledWindow,
// with edge shadows, hover-pause, lazy loading and an expanded modal view.

use gtk4::prelude::*;
use gtk4::{
    glib, AccessibleRole, Align, Box as GtkBox, EventControllerMotion, Orientation, Overlay,
    PolicyType, ScrolledWindow, Widget,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::frame_loop::FrameLoop;
use super::modal::ModalOverlay;
use super::observer::VisibilityObserver;
use super::tile::VideoTile;
use crate::carousel::{hit_test, CarouselState, IntersectionEntry, LoadHint, TickOutcome};
use crate::config::CarouselConfig;
use crate::models::MediaItem;

const SHADOW_WIDTH_PX: i32 = 48;
const STRIP_SPACING_PX: i32 = 12;

pub struct VideoCarousel {
    self_weak: Weak<VideoCarousel>,
    root: Overlay,
    scrolled: ScrolledWindow,
    strip: GtkBox,
    tiles: RefCell<Vec<VideoTile>>,
    state: RefCell<CarouselState>,
    frame_loop: FrameLoop,
    observer: VisibilityObserver,
    modal: ModalOverlay,
    config: CarouselConfig,
}

impl VideoCarousel {
    pub fn new(config: CarouselConfig) -> Rc<Self> {
        let strip = GtkBox::new(Orientation::Horizontal, STRIP_SPACING_PX);
        strip.add_css_class("video-strip");
        strip.set_halign(Align::Start);
        strip.set_valign(Align::Center);

        let scrolled = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::External)
            .vscrollbar_policy(PolicyType::Never)
            .kinetic_scrolling(true)
            .propagate_natural_height(true)
            .child(&strip)
            .build();
        scrolled.add_css_class("video-carousel");
        scrolled.set_hexpand(true);

        let region: GtkBox = glib::Object::builder()
            .property("accessible-role", AccessibleRole::ListBox)
            .property("orientation", Orientation::Horizontal)
            .build();
        region.add_css_class("video-carousel-region");
        region.update_property(&[gtk4::accessible::Property::Label("Video carousel")]);
        region.append(&scrolled);

        let root = Overlay::new();
        root.add_css_class("video-carousel-wrapper");
        root.set_child(Some(&region));
        root.add_overlay(&edge_shadow(Align::Start, "carousel-shadow-left"));
        root.add_overlay(&edge_shadow(Align::End, "carousel-shadow-right"));

        let frame_loop = FrameLoop::new(&root);
        let observer = VisibilityObserver::new(&scrolled, config.visibility_threshold);
        let state = CarouselState::new(&config);

        let carousel = Rc::new_cyclic(|self_weak| Self {
            self_weak: self_weak.clone(),
            root,
            scrolled,
            strip,
            tiles: RefCell::new(Vec::new()),
            state: RefCell::new(state),
            frame_loop,
            observer,
            modal: ModalOverlay::new(),
            config,
        });

        carousel.setup_hover(&region);
        carousel.setup_lifecycle();
        carousel.setup_modal();
        carousel
    }

    /// The carousel itself, to be placed in the host layout.
    pub fn widget(&self) -> &Overlay {
        &self.root
    }

    /// The modal layer, to be added as an overlay covering the host window.
    pub fn modal_widget(&self) -> &GtkBox {
        self.modal.widget()
    }

    /// Supply the host list. `None` renders an empty carousel.
    pub fn set_items(&self, items: Option<&[MediaItem]>) {
        let changed = self.state.borrow_mut().set_items(items);
        if !changed {
            return;
        }

        self.rebuild_tiles();
        if self.root.is_mapped() {
            self.attach_observer();
        }
    }

    fn rebuild_tiles(&self) {
        self.observer.detach();

        let mut tiles = self.tiles.borrow_mut();
        for tile in tiles.drain(..) {
            tile.apply_hint(LoadHint::Idle);
            self.strip.remove(&tile);
        }

        let state = self.state.borrow();
        for (index, item) in state.display_sequence().iter().enumerate() {
            let tile = VideoTile::new(
                index,
                item,
                self.config.item_width,
                self.config.item_height,
            );
            let carousel = self.self_weak.clone();
            tile.connect_activated(move |index| {
                if let Some(carousel) = carousel.upgrade() {
                    carousel.select(index);
                }
            });
            let carousel = self.self_weak.clone();
            tile.connect_key_activated(move |index, keyval| {
                carousel
                    .upgrade()
                    .is_some_and(|carousel| carousel.activate_with_key(index, keyval))
            });
            tile.apply_hint(state.load_hint(index));
            self.strip.append(&tile);
            tiles.push(tile);
        }

        tracing::info!("Carousel showing {} tiles", tiles.len());
        self.scrolled.hadjustment().set_value(0.0);
    }

    fn attach_observer(&self) {
        let targets: Vec<Widget> = self
            .tiles
            .borrow()
            .iter()
            .map(|tile| tile.clone().upcast())
            .collect();
        let carousel = self.self_weak.clone();
        self.observer.attach(&targets, move |batch| {
            if let Some(carousel) = carousel.upgrade() {
                carousel.handle_observations(&batch);
            }
        });
    }

    fn handle_observations(&self, batch: &[IntersectionEntry]) {
        let changed = self.state.borrow_mut().observe(batch);
        let state = self.state.borrow();
        let tiles = self.tiles.borrow();
        for index in changed {
            if let Some(tile) = tiles.get(index) {
                tile.apply_hint(state.load_hint(index));
            }
        }
    }

    fn select(&self, index: usize) {
        let opened = self.state.borrow_mut().select(index);
        if opened {
            self.show_selection();
        }
    }

    /// Enter/Space on a focused tile. Returns whether the key was consumed.
    fn activate_with_key(&self, index: usize, keyval: gdk4::Key) -> bool {
        let consumed = self.state.borrow_mut().activate_with_key(index, keyval);
        if consumed {
            self.show_selection();
        }
        consumed
    }

    fn show_selection(&self) {
        let item = self.state.borrow().active_selection().cloned();
        if let Some(item) = item {
            self.modal.show(&item);
        }
    }

    fn tick(&self) {
        // Until the container is on screen ticking is a no-op.
        let mut adjustment = self
            .scrolled
            .is_mapped()
            .then(|| self.scrolled.hadjustment());
        let scroller = self.state.borrow().scroller();
        let outcome = scroller.tick(adjustment.as_mut());
        if outcome == TickOutcome::Wrapped {
            tracing::trace!("Carousel wrapped to start");
        }
    }

    fn setup_hover(&self, region: &GtkBox) {
        let motion = EventControllerMotion::new();

        let carousel = self.self_weak.clone();
        motion.connect_enter(move |_, _x, _y| {
            if let Some(carousel) = carousel.upgrade() {
                carousel.state.borrow_mut().set_hovered(true);
            }
        });

        let carousel = self.self_weak.clone();
        motion.connect_leave(move |_| {
            if let Some(carousel) = carousel.upgrade() {
                carousel.state.borrow_mut().set_hovered(false);
            }
        });

        region.add_controller(motion);
    }

    fn setup_lifecycle(&self) {
        let carousel = self.self_weak.clone();
        self.root.connect_map(move |_| {
            if let Some(carousel) = carousel.upgrade() {
                carousel.mount();
            }
        });

        let carousel = self.self_weak.clone();
        self.root.connect_unmap(move |_| {
            if let Some(carousel) = carousel.upgrade() {
                carousel.unmount();
            }
        });
    }

    fn mount(&self) {
        let carousel = self.self_weak.clone();
        self.frame_loop.start(move || {
            if let Some(carousel) = carousel.upgrade() {
                carousel.tick();
            }
        });
        self.attach_observer();
    }

    fn unmount(&self) {
        self.frame_loop.stop();
        self.observer.detach();
        self.state.borrow_mut().set_hovered(false);
    }

    fn setup_modal(&self) {
        let carousel = self.self_weak.clone();
        self.modal.connect_backdrop_pressed(move |x, y| {
            let Some(carousel) = carousel.upgrade() else {
                return;
            };
            let hit = hit_test(x, y, carousel.modal.content_bounds().as_ref());
            let closed = carousel.state.borrow_mut().dismiss(hit);
            if closed {
                carousel.modal.hide();
            }
        });

        let carousel = self.self_weak.clone();
        self.modal.connect_key_pressed(move |keyval| {
            let Some(carousel) = carousel.upgrade() else {
                return false;
            };
            let closed = carousel.state.borrow_mut().dismiss_with_key(keyval);
            if closed {
                carousel.modal.hide();
            }
            closed
        });
    }
}

impl Drop for VideoCarousel {
    fn drop(&mut self) {
        self.frame_loop.stop();
        self.observer.detach();
    }
}

fn edge_shadow(halign: Align, class: &str) -> GtkBox {
    let shadow: GtkBox = glib::Object::builder()
        .property("accessible-role", AccessibleRole::Presentation)
        .build();
    shadow.add_css_class("carousel-shadow");
    shadow.add_css_class(class);
    shadow.set_halign(halign);
    shadow.set_valign(Align::Fill);
    shadow.set_width_request(SHADOW_WIDTH_PX);
    shadow.set_can_target(false);
    shadow
}
