// Main window hosting the video carousel
// The carousel sits in the window body; its modal layer is added as a
// window-wide overlay so the backdrop covers everything.

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, Orientation, Overlay,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::rc::Rc;

use super::carousel_view::VideoCarousel;
use crate::config::CarouselConfig;
use crate::models::MediaItem;

const WINDOW_WIDTH: i32 = 1280;
const WINDOW_HEIGHT: i32 = 420;
const PAGE_MARGIN: i32 = 32;

/// Embedded stylesheet; a `style.css` in the config directory replaces it.
const FALLBACK_CSS: &str = r#"
window {
    background-color: #0a0a0a;
    color: #e0e0e0;
}

.video-carousel-wrapper {
    background-color: #0a0a0a;
}

.video-strip {
    padding: 8px 0;
}

videotile.video-container {
    background-color: #121212;
    border: 1px solid #333333;
    border-radius: 6px;
}

videotile.video-container:hover {
    border-color: #555555;
}

videotile.video-container:focus-visible {
    border-color: #00ff88;
    border-style: dashed;
}

.carousel-shadow-left {
    background-image: linear-gradient(to right, #0a0a0a, rgba(10, 10, 10, 0));
}

.carousel-shadow-right {
    background-image: linear-gradient(to left, #0a0a0a, rgba(10, 10, 10, 0));
}

.modal-backdrop {
    background-color: rgba(0, 0, 0, 0.8);
}

.modal-content {
    background-color: #000000;
    border: 1px solid #333333;
    padding: 8px;
}
"#;

/// Load the user stylesheet if present, otherwise the embedded one
fn load_css(config: &CarouselConfig) {
    let provider = CssProvider::new();

    match config.style_path() {
        Some(css_path) if css_path.exists() => {
            provider.load_from_path(&css_path);
            tracing::info!("Loaded CSS from: {}", css_path.display());
        }
        _ => {
            provider.load_from_string(FALLBACK_CSS);
            tracing::info!("Loaded fallback embedded CSS");
        }
    }

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

pub struct MainWindow {
    window: ApplicationWindow,
    carousel: Rc<VideoCarousel>,
}

impl MainWindow {
    pub fn new(app: &Application, config: CarouselConfig, items: Option<&[MediaItem]>) -> Self {
        load_css(&config);

        let carousel = VideoCarousel::new(config);
        carousel.set_items(items);

        let page = GtkBox::new(Orientation::Vertical, 0);
        page.set_margin_top(PAGE_MARGIN);
        page.set_margin_bottom(PAGE_MARGIN);
        page.set_margin_start(PAGE_MARGIN);
        page.set_margin_end(PAGE_MARGIN);
        page.set_valign(Align::Center);
        page.append(carousel.widget());

        let overlay = Overlay::new();
        overlay.set_child(Some(&page));
        overlay.add_overlay(carousel.modal_widget());

        let window = ApplicationWindow::builder()
            .application(app)
            .title("vidreel")
            .default_width(WINDOW_WIDTH)
            .default_height(WINDOW_HEIGHT)
            .child(&overlay)
            .build();

        Self { window, carousel }
    }

    pub fn present(&self) {
        self.window.present();
    }

    /// Replace the carousel's items, e.g. when more files are opened.
    pub fn set_items(&self, items: Option<&[MediaItem]>) {
        self.carousel.set_items(items);
    }
}
