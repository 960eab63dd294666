// Expanded video view layered over the window
// Backdrop covers the whole window; the content box hosts a Video with
// controls. Clicks are reported with their position so the owner can decide
// between backdrop and content.

use gdk4::Key;
use gtk4::prelude::*;
use gtk4::{
    glib, AccessibleRole, Align, Box as GtkBox, EventControllerKey, GestureClick, MediaStream,
    Orientation, PropagationPhase, Video,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::carousel::Rect;
use crate::models::MediaItem;

pub type BackdropPressedCallback = Box<dyn Fn(f64, f64)>;
pub type ModalKeyCallback = Box<dyn Fn(Key) -> bool>;

pub struct ModalOverlay {
    backdrop: GtkBox,
    content: GtkBox,
    video: Video,
    on_backdrop_pressed: Rc<RefCell<Option<BackdropPressedCallback>>>,
    on_key_pressed: Rc<RefCell<Option<ModalKeyCallback>>>,
}

impl ModalOverlay {
    pub fn new() -> Self {
        let backdrop: GtkBox = glib::Object::builder()
            .property("accessible-role", AccessibleRole::Dialog)
            .property("orientation", Orientation::Vertical)
            .build();
        backdrop.add_css_class("modal-backdrop");
        backdrop.set_hexpand(true);
        backdrop.set_vexpand(true);
        backdrop.set_halign(Align::Fill);
        backdrop.set_valign(Align::Fill);
        backdrop.set_focusable(true);
        backdrop.set_visible(false);
        backdrop.update_property(&[
            gtk4::accessible::Property::Label("Expanded video view"),
            gtk4::accessible::Property::Modal(true),
        ]);

        let content = GtkBox::new(Orientation::Vertical, 0);
        content.add_css_class("modal-content");
        content.set_halign(Align::Center);
        content.set_valign(Align::Center);
        content.set_hexpand(true);
        content.set_vexpand(true);

        let video = Video::new();
        video.set_autoplay(true);
        video.set_loop(true);
        video.set_size_request(960, 540);
        video.add_css_class("modal-video");
        content.append(&video);
        backdrop.append(&content);

        let on_backdrop_pressed: Rc<RefCell<Option<BackdropPressedCallback>>> =
            Rc::new(RefCell::new(None));
        let on_key_pressed: Rc<RefCell<Option<ModalKeyCallback>>> = Rc::new(RefCell::new(None));

        let click = GestureClick::new();
        let callback = on_backdrop_pressed.clone();
        click.connect_pressed(move |_, _n, x, y| {
            if let Some(ref callback) = *callback.borrow() {
                callback(x, y);
            }
        });
        backdrop.add_controller(click);

        let keys = EventControllerKey::new();
        keys.set_propagation_phase(PropagationPhase::Capture);
        let callback = on_key_pressed.clone();
        keys.connect_key_pressed(move |_, keyval, _keycode, _state| {
            let handled = callback
                .borrow()
                .as_ref()
                .map(|callback| callback(keyval))
                .unwrap_or(false);
            if handled {
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });
        backdrop.add_controller(keys);

        Self {
            backdrop,
            content,
            video,
            on_backdrop_pressed,
            on_key_pressed,
        }
    }

    /// The layer to add as a window-level overlay.
    pub fn widget(&self) -> &GtkBox {
        &self.backdrop
    }

    pub fn show(&self, item: &MediaItem) {
        tracing::info!("Opening expanded view for: {}", item.url());
        self.video.set_file(Some(&item.to_file()));
        self.backdrop.set_visible(true);
        self.backdrop.grab_focus();
    }

    pub fn hide(&self) {
        if !self.backdrop.is_visible() {
            return;
        }
        tracing::info!("Closing expanded view");
        if let Some(stream) = self.video.media_stream() {
            stream.pause();
        }
        self.video.set_media_stream(Option::<&MediaStream>::None);
        self.backdrop.set_visible(false);
    }

    /// Bounds of the content box in backdrop coordinates, once laid out.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.content.compute_bounds(&self.backdrop).map(|bounds| {
            Rect::new(
                bounds.x() as f64,
                bounds.y() as f64,
                bounds.width() as f64,
                bounds.height() as f64,
            )
        })
    }

    pub fn connect_backdrop_pressed<F>(&self, callback: F)
    where
        F: Fn(f64, f64) + 'static,
    {
        *self.on_backdrop_pressed.borrow_mut() = Some(Box::new(callback));
    }

    pub fn connect_key_pressed<F>(&self, callback: F)
    where
        F: Fn(Key) -> bool + 'static,
    {
        *self.on_key_pressed.borrow_mut() = Some(Box::new(callback));
    }
}

impl Default for ModalOverlay {
    fn default() -> Self {
        Self::new()
    }
}
