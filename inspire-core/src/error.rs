//! Error types for inspire-core.

use thiserror::Error;

/// Errors that can occur while building queries or writing calendars.
#[derive(Error, Debug)]
pub enum SeminarError {
    #[error("Invalid series name {name:?}: {reason}")]
    InvalidSeriesName { name: String, reason: &'static str },

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for inspire-core operations.
pub type SeminarResult<T> = Result<T, SeminarError>;
