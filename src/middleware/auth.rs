//! API key authentication.
//!
//! Protected requests carry `Authorization: ApiKey <key>`. The middleware
//! extracts the key, looks up the user that owns it and injects an
//! [`AuthContext`] into the request for handlers to pick up.

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::user::User,
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Authorization scheme expected in front of the key.
const API_KEY_SCHEME: &str = "ApiKey";

/// Why a credential could not be read from the request headers.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no authorization header included")]
    MissingCredential,

    #[error("{0}")]
    MalformedCredential(String),
}

/// Authentication context attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The user owning the presented API key
    pub user: User,
}

/// Extract the API key from the `Authorization` header.
///
/// The value is split on whitespace runs. The first part must be exactly
/// `ApiKey` and the second part is returned as the key; anything after it is
/// ignored, so a key containing spaces comes back truncated.
///
/// # Errors
///
/// - `MissingCredential` if the header is absent or empty
/// - `MalformedCredential` if the header is not valid UTF-8, has fewer than
///   two parts, or uses a scheme other than `ApiKey`
pub fn get_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingCredential),
    };

    let value = std::str::from_utf8(value.as_bytes())
        .map_err(|_| malformed("authorization header is not valid UTF-8"))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(API_KEY_SCHEME), Some(key)) => Ok(key.to_string()),
        _ => Err(malformed("malformed authorization header")),
    }
}

fn malformed(message: &str) -> AuthError {
    AuthError::MalformedCredential(message.to_string())
}

/// API key authentication middleware.
///
/// # Flow
///
/// 1. Extract the key with [`get_api_key`]
/// 2. Look up the user owning the key
/// 3. Inject `AuthContext` into the request and call the next handler
///
/// # Returns
///
/// - `Err(AppError::Unauthorized)` if the header is missing or malformed (401)
/// - `Err(AppError::InvalidApiKey)` if no user owns the key (401)
/// - `Err(AppError::GetUser)` if the lookup itself fails (500)
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = get_api_key(request.headers())?;

    let user = match db::get_user(&pool, &api_key).await {
        Ok(user) => user,
        Err(sqlx::Error::RowNotFound) => return Err(AppError::InvalidApiKey),
        Err(e) => return Err(AppError::GetUser(e)),
    };

    tracing::debug!(user_id = %user.id, "request authenticated");

    // Handlers read this with Extension<AuthContext>
    request.extensions_mut().insert(AuthContext { user });

    Ok(next.run(request).await)
}
