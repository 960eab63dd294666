pub mod display_sequence;
pub mod media_item;

pub use display_sequence::*;
pub use media_item::*;
