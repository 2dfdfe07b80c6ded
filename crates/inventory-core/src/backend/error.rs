//! Backend Errors

use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

/// Failures talking to the hosted backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// Missing, expired or rejected credentials
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}
