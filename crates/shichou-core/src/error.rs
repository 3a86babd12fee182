use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShichouError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("selector database error: {0}")]
    Selectors(#[from] shichou_detect::DetectError),

    #[error("invalid page URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("report sink failed: {0}")]
    Sink(String),
}
