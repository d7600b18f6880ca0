//! User data models and API request/response types.
//!
//! - `User`: row from the `users` table
//! - `NewUser`: values inserted when a user is created
//! - `CreateUserRequest`: request body for `POST /v1/users`
//! - `UserResponse`: public representation returned to clients

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
///
/// Timestamps are stored as RFC 3339 text and only parsed when the record is
/// turned into a [`UserResponse`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// UUID v4, assigned once at creation
    pub id: String,

    pub created_at: String,

    pub updated_at: String,

    /// Display name, may be empty and is not unique
    pub name: String,

    /// 64 lowercase hex characters, the user's only credential
    pub api_key: String,
}

/// Values for a row about to be inserted into `users`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub name: String,
    pub api_key: String,
}

impl NewUser {
    /// Build a row with a fresh identifier and a single `now` timestamp
    /// shared by `created_at` and `updated_at`.
    pub fn new(name: String, api_key: String) -> Self {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now.clone(),
            updated_at: now,
            name,
            api_key,
        }
    }
}

/// Request body for creating a user.
///
/// ```json
/// { "name": "Alice" }
/// ```
///
/// A missing or `null` name is treated as the empty string.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response body for user endpoints.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "created_at": "2025-12-20T10:00:00Z",
///   "updated_at": "2025-12-20T10:00:00Z",
///   "name": "Alice",
///   "api_key": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub api_key: String,
}

/// Fails if a stored timestamp is not valid RFC 3339.
impl TryFrom<User> for UserResponse {
    type Error = chrono::ParseError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&user.created_at)?.with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&user.updated_at)?.with_timezone(&Utc);

        Ok(Self {
            id: user.id,
            created_at,
            updated_at,
            name: user.name,
            api_key: user.api_key,
        })
    }
}
