// ================================================================
// File: stailist-common/src/error.rs
// ================================================================

use thiserror::Error;

use crate::models::CallKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Import documents that fail validation. Current state is never touched.
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("A {0} request is already in progress")]
    Busy(CallKind),

    #[error("AI error: {0}")]
    Ai(String),

    /// Non-2xx response from the persistence backend.
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Network and service failures the user may simply try again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Ai(_) | Error::Backend { .. } | Error::Http(_) | Error::Io(_) | Error::Busy(_)
        )
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        // Everything that comes back as anyhow is a provider failure.
        Error::Ai(e.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("invalid URL: {}", err))
    }
}
