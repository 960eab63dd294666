// Carousel tile: one focusable, lazily loaded video preview
// The media stream is only created once the tile has been flagged visible.

use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    gdk, glib, AccessibleRole, ContentFit, EventControllerKey, GestureClick, MediaFile, Picture,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::carousel::{is_click_release, item_name, LoadHint, Rect};
use crate::models::MediaItem;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct VideoTileInner {
        pub picture: RefCell<Option<Picture>>,
        pub stream: RefCell<Option<MediaFile>>,
        pub item: RefCell<Option<MediaItem>>,
        pub index: Cell<usize>,
        pub on_activated: RefCell<Option<Rc<dyn Fn(usize)>>>,
        pub on_key: RefCell<Option<Rc<dyn Fn(usize, gdk::Key) -> bool>>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for VideoTileInner {
        const NAME: &'static str = "VidreelVideoTile";
        type Type = super::VideoTile;
        type ParentType = gtk4::Box;

        fn class_init(klass: &mut Self::Class) {
            klass.set_css_name("videotile");
            klass.set_accessible_role(AccessibleRole::Option);
        }
    }

    impl ObjectImpl for VideoTileInner {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_focusable(true);
            obj.set_focus_on_click(true);
            obj.set_overflow(gtk4::Overflow::Hidden);
            obj.add_css_class("video-container");

            let picture = Picture::new();
            picture.set_can_shrink(true);
            picture.set_content_fit(ContentFit::Cover);
            picture.set_hexpand(true);
            picture.set_vexpand(true);
            picture.add_css_class("video-preview");
            obj.append(&picture);
            *self.picture.borrow_mut() = Some(picture);
        }

        fn dispose(&self) {
            if let Some(stream) = self.stream.borrow_mut().take() {
                stream.pause();
            }
        }
    }

    impl WidgetImpl for VideoTileInner {}
    impl BoxImpl for VideoTileInner {}
}

glib::wrapper! {
    pub struct VideoTile(ObjectSubclass<imp::VideoTileInner>)
        @extends gtk4::Box, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl VideoTile {
    pub fn new(index: usize, item: &MediaItem, width: i32, height: i32) -> Self {
        let tile: Self = Object::builder().build();
        tile.bind(index, item, width, height);
        tile.setup_input();
        tile
    }

    fn bind(&self, index: usize, item: &MediaItem, width: i32, height: i32) {
        let imp = self.imp();
        imp.index.set(index);
        imp.item.replace(Some(item.clone()));

        self.set_widget_name(&item_name(index));
        self.set_size_request(width, height);
        self.set_tooltip_text(Some(item.url()));
        self.update_property(&[gtk4::accessible::Property::Label(&format!(
            "Video {}",
            index + 1
        ))]);
    }

    fn setup_input(&self) {
        let click = GestureClick::new();
        click.set_button(gdk::BUTTON_PRIMARY);
        let tile = self.downgrade();
        // A drag claimed by the scrolled window cancels the gesture, so no
        // release is delivered for it.
        click.connect_released(move |_, n_press, x, y| {
            let Some(tile) = tile.upgrade() else {
                return;
            };
            let bounds = Rect::new(0.0, 0.0, tile.width() as f64, tile.height() as f64);
            if is_click_release(n_press, x, y, &bounds) {
                tile.grab_focus();
                tile.emit_activated();
            }
        });
        self.add_controller(click);

        let keys = EventControllerKey::new();
        let tile = self.downgrade();
        keys.connect_key_pressed(move |_, keyval, _keycode, _state| {
            let consumed = tile.upgrade().is_some_and(|tile| tile.emit_key(keyval));
            // Consuming the key keeps Space from scrolling the page
            if consumed {
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });
        self.add_controller(keys);
    }

    pub fn index(&self) -> usize {
        self.imp().index.get()
    }

    /// Attach, play, pause or release the media according to the hint.
    pub fn apply_hint(&self, hint: LoadHint) {
        let imp = self.imp();
        match hint {
            LoadHint::Idle => {
                if let Some(stream) = imp.stream.borrow_mut().take() {
                    stream.pause();
                }
                if let Some(picture) = imp.picture.borrow().as_ref() {
                    picture.set_paintable(Option::<&gdk::Paintable>::None);
                }
            }
            LoadHint::Load => {
                if let Some(stream) = imp.stream.borrow().as_ref() {
                    stream.play();
                    return;
                }
                let Some(item) = imp.item.borrow().clone() else {
                    return;
                };
                let stream = MediaFile::for_file(&item.to_file());
                stream.set_muted(true);
                stream.set_loop(true);
                if let Some(picture) = imp.picture.borrow().as_ref() {
                    picture.set_paintable(Some(&stream));
                }
                stream.play();
                tracing::debug!(index = imp.index.get(), url = item.url(), "Tile media loaded");
                *imp.stream.borrow_mut() = Some(stream);
            }
            LoadHint::Suspend => {
                if let Some(stream) = imp.stream.borrow().as_ref() {
                    stream.pause();
                }
            }
        }
    }

    pub fn connect_activated<F>(&self, callback: F)
    where
        F: Fn(usize) + 'static,
    {
        *self.imp().on_activated.borrow_mut() = Some(Rc::new(callback));
    }

    /// Key presses while focused. The callback returns whether it consumed
    /// the key.
    pub fn connect_key_activated<F>(&self, callback: F)
    where
        F: Fn(usize, gdk::Key) -> bool + 'static,
    {
        *self.imp().on_key.borrow_mut() = Some(Rc::new(callback));
    }

    fn emit_key(&self, keyval: gdk::Key) -> bool {
        let callback = self.imp().on_key.borrow().clone();
        callback.is_some_and(|callback| callback(self.index(), keyval))
    }

    fn emit_activated(&self) {
        let callback = self.imp().on_activated.borrow().clone();
        if let Some(callback) = callback {
            callback(self.index());
        }
    }
}
