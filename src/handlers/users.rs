//! User HTTP handlers.
//!
//! - POST /v1/users - Create a user and issue its API key
//! - GET /v1/users - Return the user owning the presented API key

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::user::{CreateUserRequest, UserResponse},
    services::user_service,
};
use axum::{Extension, Json, body::Bytes, extract::State, http::StatusCode};

/// Create a new user.
///
/// # Endpoint
///
/// `POST /v1/users`
///
/// # Request Body
///
/// ```json
/// { "name": "Alice" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the created user, including its API key
/// - **Error (500)**: any failure, with a generic message
///
/// The body is decoded by hand rather than through the `Json` extractor so
/// that an undecodable body gets the same `{"error": ...}` shape as every
/// other failure.
pub async fn create_user(
    State(pool): State<DbPool>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    tracing::info!("received request to create user");

    let request: CreateUserRequest =
        serde_json::from_slice(&body).map_err(AppError::InvalidRequest)?;

    let user = user_service::create_user(&pool, request.name.unwrap_or_default()).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get the authenticated user.
///
/// # Endpoint
///
/// `GET /v1/users`
///
/// # Authentication
///
/// Requires `Authorization: ApiKey <key>`; the auth middleware resolves the user.
pub async fn get_user(
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(user_service::to_response(auth.user)?))
}
