use thiserror::Error;

use crate::cache::store::StoreError;

/// Main error type for the shelf engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Key-value store errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image source errors
    #[error("image source '{name}' error: {message}")]
    Source { name: String, message: String },

    /// No images could be resolved for a subject
    #[error("no images found for subject: {0}")]
    NoImages(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Other(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
