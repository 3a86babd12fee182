//! Request/response bridge between the extraction context and the
//! privileged page context that owns the internal video cache.
//!
//! The two sides share nothing but a [`PageChannel`]. The extraction side
//! posts a correlated [`BridgeRequest`] and waits, bounded by a timeout, for
//! the matching [`BridgeResponse`]; the page side answers every request it
//! sees, converting lookup failures into failure responses.

pub mod channel;
pub mod client;
pub mod error;
pub mod protocol;
pub mod responder;

pub use channel::{PageChannel, WeakPageChannel};
pub use client::{DataBridge, DEFAULT_TIMEOUT};
pub use error::BridgeError;
pub use protocol::{BridgeMessage, BridgeRequest, BridgeResponse, PageSnapshot};
pub use responder::{FalcorCache, PageResponder, VideoCache};
