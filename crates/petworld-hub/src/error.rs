//! Error types for petworld-hub

use thiserror::Error;

/// Result type for petworld-hub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in petworld-hub
#[derive(Debug, Error)]
pub enum Error {
    /// Lifecycle or storage error
    #[error("core error: {0}")]
    Core(#[from] petworld_core::Error),

    /// Content could not be loaded
    #[error("content error: {0}")]
    Content(#[from] petworld_config::Error),
}

impl Error {
    /// The lifecycle error, if this is one
    pub fn core(&self) -> Option<&petworld_core::Error> {
        match self {
            Error::Core(err) => Some(err),
            Error::Content(_) => None,
        }
    }

    /// Whether a retry of the same request could succeed
    pub fn is_retryable(&self) -> bool {
        self.core().is_some_and(petworld_core::Error::is_retryable)
    }
}

// Compile-time check that Error is Send + Sync for thread-safe error propagation.
// This function is never called but will fail to compile if the bound is not satisfied.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
