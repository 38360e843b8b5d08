//! Business errors raised by the activity directory.

use thiserror::Error;

use crate::db::repository::RepositoryError;

pub const ACTIVITY_NOT_FOUND: &str = "Activity not found";
pub const REGISTRATION_REQUIRED: &str =
    "Student not found. Provide name and grade_level to register.";
pub const ALREADY_SIGNED_UP: &str = "Student is already signed up";
pub const NOT_SIGNED_UP: &str = "Student is not signed up for this activity";

/// Failure of a directory operation.
///
/// Every variant except [`DirectoryError::Repository`] is a client error and
/// is reported as-is, never retried.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No activity with the requested name exists.
    #[error("{0}")]
    NotFound(String),

    /// The request is missing data needed to complete it.
    #[error("{0}")]
    InvalidInput(String),

    /// Signup for a student who is already a participant.
    #[error("{0}")]
    AlreadyRegistered(String),

    /// Unregister for a student who is not a participant.
    #[error("{0}")]
    NotRegistered(String),

    /// The underlying store failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    pub fn activity_not_found() -> Self {
        Self::NotFound(ACTIVITY_NOT_FOUND.to_string())
    }

    pub fn registration_required() -> Self {
        Self::InvalidInput(REGISTRATION_REQUIRED.to_string())
    }

    pub fn already_registered() -> Self {
        Self::AlreadyRegistered(ALREADY_SIGNED_UP.to_string())
    }

    pub fn not_registered() -> Self {
        Self::NotRegistered(NOT_SIGNED_UP.to_string())
    }

    /// Whether the error was caused by the request rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::InvalidInput(msg)
            | Self::AlreadyRegistered(msg)
            | Self::NotRegistered(msg) => msg.clone(),
            Self::Repository(err) => err.to_string(),
        }
    }
}
