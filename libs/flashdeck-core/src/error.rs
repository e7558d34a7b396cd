//! Error types for flashdeck-core.

use thiserror::Error;

/// Result type alias using SetError.
pub type Result<T> = std::result::Result<T, SetError>;

/// Errors from set validation and import.
#[derive(Debug, Error)]
pub enum SetError {
    #[error("set topic must not be empty")]
    EmptyTopic,

    #[error("a set needs at least {min} cards, found {found}")]
    TooFewCards { min: usize, found: usize },

    #[error("invalid set file: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}
