use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("selector database error: {0}")]
    Database(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
