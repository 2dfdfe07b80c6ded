//! Domain Errors
//!
//! Result type shared by the hooks and everything above them.

use thiserror::Error;

use crate::backend::BackendError;

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl DomainError {
    /// Whether the error was raised locally, before any remote call
    pub fn is_local(&self) -> bool {
        !matches!(self, DomainError::Backend(_))
    }
}
