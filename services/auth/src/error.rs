//! Custom error types for the authentication service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::RepositoryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors reported by the signup and login flows
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing, malformed or invalid request fields
    #[error("{0}")]
    Validation(String),

    /// The email is already registered
    #[error("User already exists")]
    Conflict,

    /// No user matches the email
    #[error("User not found")]
    NotFound,

    /// The password does not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Too many recent login attempts for the email
    #[error("Too many login attempts, please try again later")]
    TooManyAttempts,

    /// The user store failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] RepositoryError),

    /// Hashing, signing or another internal step failed
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => AuthError::Conflict,
            other => AuthError::StoreUnavailable(other),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Validation(_)
            | AuthError::Conflict
            | AuthError::NotFound
            | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            AuthError::StoreUnavailable(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Authentication request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
