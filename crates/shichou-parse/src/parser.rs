//! Text-level strategies used by the metadata pipeline.
//!
//! Everything here is pure: input strings in, `Option` out. The DOM and URL
//! lookups that feed these functions live in `shichou-detect`.

pub mod episode;
pub mod fields;
pub mod title;
pub mod watch;
