pub mod assembler;
pub mod classifier;
pub mod config;
pub mod control;
pub mod error;
pub mod models;
pub mod resolver;
pub mod watcher;

pub use assembler::MediaAssembler;
pub use config::AppConfig;
pub use control::{ControlHandler, ControlMessage, ExtractDataResponse};
pub use error::ShichouError;
pub use models::{MediaRecord, MediaType, ViewedEvent};
pub use watcher::{LogSink, ProgressWatcher, TickOutcome, ViewedSink, WatchState};
