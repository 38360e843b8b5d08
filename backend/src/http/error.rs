//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::DirectoryError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the directory service
    Directory(DirectoryError),
}

impl AppError {
    /// Status code and body for this error.
    pub fn parts(&self) -> (StatusCode, ApiError) {
        let AppError::Directory(err) = self;
        let message = err.message();
        match err {
            DirectoryError::NotFound(_) => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            DirectoryError::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_INPUT", message),
            ),
            DirectoryError::AlreadyRegistered(_) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("ALREADY_REGISTERED", message),
            ),
            DirectoryError::NotRegistered(_) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("NOT_REGISTERED", message),
            ),
            DirectoryError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPOSITORY_ERROR", message),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        (status, Json(error)).into_response()
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError::Directory(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Directory(DirectoryError::Repository(err))
    }
}
