//! Error types and HTTP error response handling.
//!
//! Every variant carries the underlying cause for the log line, while the
//! client only ever receives a fixed message in `{"error": "..."}`.

use crate::middleware::auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Request Errors**: body could not be decoded
/// - **Key Generation Errors**: the OS randomness source failed
/// - **Persistence Errors**: insert or read-back of a user failed
/// - **Mapping Errors**: a stored row cannot become a public response
/// - **Authentication Errors**: missing, malformed or unknown API key
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body is not valid JSON for the expected shape.
    ///
    /// Logically a client error, but answered with HTTP 500 like every other
    /// creation failure.
    #[error("Couldn't decode parameters: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    /// Reading from the OS random number generator failed.
    #[error("Couldn't generate API key: {0}")]
    KeyGeneration(String),

    /// Inserting the new user failed.
    #[error("Couldn't create user in the database: {0}")]
    CreateUser(#[source] sqlx::Error),

    /// Reading the user back by API key failed.
    #[error("Couldn't retrieve user from the database: {0}")]
    GetUser(#[source] sqlx::Error),

    /// A stored timestamp is not valid RFC 3339.
    #[error("Couldn't convert user to response format: {0}")]
    ResponseMapping(#[from] chrono::ParseError),

    /// `Authorization` header is missing or malformed.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// Well-formed API key that no user owns.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Any other database failure (e.g. health probe).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// HTTP status and the message shown to the client.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidRequest(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Couldn't decode parameters")
            }
            AppError::KeyGeneration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Couldn't generate API key")
            }
            AppError::CreateUser(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Couldn't create user"),
            AppError::GetUser(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Couldn't get user"),
            AppError::ResponseMapping(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Couldn't convert user")
            }
            AppError::Unauthorized(AuthError::MissingCredential) => {
                (StatusCode::UNAUTHORIZED, "Couldn't find api key")
            }
            AppError::Unauthorized(AuthError::MalformedCredential(_)) => {
                (StatusCode::UNAUTHORIZED, "Malformed authorization header")
            }
            AppError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "Invalid API key"),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred",
            ),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// { "error": "Couldn't create user" }
/// ```
///
/// The full error, including its source, is logged before the response is
/// built. Server errors log at `error`, authentication failures at `warn`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
