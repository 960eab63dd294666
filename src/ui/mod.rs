mod carousel_view;
mod frame_loop;
mod modal;
mod observer;
mod tile;
mod window;

pub use carousel_view::VideoCarousel;
pub use window::MainWindow;
