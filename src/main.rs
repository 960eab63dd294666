mod app;
mod carousel;
mod config;
mod models;
mod playlist;
mod ui;

use app::VidreelApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vidreel=info".parse().unwrap()),
        )
        .init();

    let app = VidreelApp::new();
    std::process::exit(app.run());
}
