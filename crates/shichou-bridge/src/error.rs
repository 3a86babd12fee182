use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed video cache: {0}")]
    MalformedCache(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
