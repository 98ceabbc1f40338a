use crate::upload::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PressError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Could not read image '{name}': {reason}")]
    Decode { name: String, reason: String },

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("No block at position {index} (composer has {len} blocks)")]
    BlockIndex { index: usize, len: usize },

    #[error("Block at position {index} is not a {expected} block")]
    BlockKind { index: usize, expected: &'static str },

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl PressError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PressError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PressError>;
