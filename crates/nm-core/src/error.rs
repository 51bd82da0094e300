//! # RepoError
//!
//! Failures a `PostRepository` can report. Consumers are expected to treat
//! them as opaque; the variants exist for logs, not for branching.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// No post with this id exists on the backend.
    #[error("post not found with ID {0}")]
    NotFound(i64),

    /// The backend could not be reached or refused the call.
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    /// Anything else (bad payload, broken invariant on the backend side).
    #[error("internal repository error: {0}")]
    Internal(String),
}

/// A specialized Result type for repository calls.
pub type Result<T> = std::result::Result<T, RepoError>;
