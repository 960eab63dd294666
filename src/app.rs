use anyhow::Context;
use gtk4::prelude::*;
use gtk4::{gio, Application};

use crate::config::CarouselConfig;
use crate::models::MediaItem;
use crate::playlist::{read_playlist, scan_video_dir};
use crate::ui::MainWindow;

const APP_ID: &str = "com.vidreel.VideoCarousel";
const WINDOW_KEY: &str = "main-window";

pub struct VidreelApp {
    app: Application,
}

impl VidreelApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        let config = CarouselConfig::from_env();
        let action = plan_window(Self::has_window(app), None, || {
            load_playlist_items(&config).unwrap_or_else(|err| {
                tracing::warn!(error = ?err, "Failed to load playlist, showing empty carousel");
                None
            })
        });
        Self::apply(app, config, action);
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let items = items_from_files(files);
        let action = plan_window(Self::has_window(app), Some(items), || None);
        Self::apply(app, CarouselConfig::from_env(), action);
    }

    fn has_window(app: &Application) -> bool {
        Self::with_window(app, |_| ()).is_some()
    }

    fn with_window<R>(app: &Application, f: impl FnOnce(&MainWindow) -> R) -> Option<R> {
        let window = unsafe { app.data::<MainWindow>(WINDOW_KEY) }?;
        // Owned by the application's data table until the app is dropped
        Some(f(unsafe { window.as_ref() }))
    }

    fn apply(app: &Application, config: CarouselConfig, action: WindowAction) {
        match action {
            WindowAction::Present => {
                Self::with_window(app, MainWindow::present);
            }
            WindowAction::Replace(items) => {
                Self::with_window(app, |window| {
                    window.set_items(Some(items.as_slice()));
                    window.present();
                });
            }
            WindowAction::Create(items) => {
                let window = MainWindow::new(app, config, items.as_deref());
                window.present();
                // Keep the window alive by storing it on the Application.
                unsafe {
                    app.set_data(WINDOW_KEY, window);
                }
            }
        }
    }
}

/// What an activate or open request does with the single main window.
#[derive(Debug, PartialEq)]
enum WindowAction {
    /// Raise the existing window as it is.
    Present,
    /// Show newly opened items in the existing window.
    Replace(Vec<MediaItem>),
    /// First request: build the window.
    Create(Option<Vec<MediaItem>>),
}

/// Decide how to serve a request. `opened` holds files passed on the command
/// line; `load` supplies the default items and only runs when a window has to
/// be built without them.
fn plan_window<F>(has_window: bool, opened: Option<Vec<MediaItem>>, load: F) -> WindowAction
where
    F: FnOnce() -> Option<Vec<MediaItem>>,
{
    match (has_window, opened) {
        (true, None) => WindowAction::Present,
        (true, Some(items)) => WindowAction::Replace(items),
        (false, Some(items)) => WindowAction::Create(Some(items)),
        (false, None) => WindowAction::Create(load()),
    }
}

impl Default for VidreelApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Items from the configured playlist file. `Ok(None)` when there is none.
fn load_playlist_items(config: &CarouselConfig) -> anyhow::Result<Option<Vec<MediaItem>>> {
    let Some(path) = config.resolved_playlist_path() else {
        tracing::debug!("No playlist location available");
        return Ok(None);
    };
    let items = read_playlist(&path)
        .with_context(|| format!("Failed to load playlist: {:?}", path))?;
    if items.is_none() {
        tracing::info!("No playlist at {}", path.display());
    }
    Ok(items)
}

/// Turn opened files into items, expanding local directories into the video
/// files they contain. Order follows the command line.
fn items_from_files(files: &[gio::File]) -> Vec<MediaItem> {
    let mut items = Vec::new();
    for file in files {
        let local_dir = file.path().filter(|path| path.is_dir());
        match local_dir {
            Some(dir) => {
                let found = scan_video_dir(&dir);
                tracing::info!("Found {} videos in {}", found.len(), dir.display());
                items.extend(found);
            }
            None => items.push(MediaItem::from_file(file)),
        }
    }
    items
}
