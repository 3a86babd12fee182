pub mod event;
pub mod media;

pub use event::ViewedEvent;
pub use media::{MediaRecord, MediaType};
