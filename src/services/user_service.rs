//! User service - creation and presentation of user records.
//!
//! # Creation Flow
//!
//! 1. Generate an API key from the OS random number generator
//! 2. Insert the user with a fresh UUID and a single UTC timestamp
//! 3. Read the user back by API key to confirm the write
//! 4. Convert the stored row to the public response shape

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::user::{NewUser, User, UserResponse},
};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Generate a new API key.
///
/// # Output
///
/// 64 lowercase hex characters: the SHA-256 digest of 32 random bytes.
///
/// # Errors
///
/// `KeyGeneration` if the OS randomness source is unavailable.
pub fn generate_api_key() -> Result<String, AppError> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::KeyGeneration(e.to_string()))?;

    Ok(hex::encode(Sha256::digest(bytes)))
}

/// Create a user and return its public representation.
///
/// # Errors
///
/// - `KeyGeneration`: randomness source failed
/// - `CreateUser`: insert failed
/// - `GetUser`: the new row could not be read back
/// - `ResponseMapping`: stored timestamps could not be parsed
pub async fn create_user(pool: &DbPool, name: String) -> Result<UserResponse, AppError> {
    let api_key = generate_api_key()?;
    let new_user = NewUser::new(name, api_key);

    db::create_user(pool, &new_user)
        .await
        .map_err(AppError::CreateUser)?;

    tracing::info!(user_id = %new_user.id, name = %new_user.name, "user created");

    let user = db::get_user(pool, &new_user.api_key)
        .await
        .map_err(AppError::GetUser)?;

    to_response(user)
}

/// Convert a stored user to its public representation.
pub fn to_response(user: User) -> Result<UserResponse, AppError> {
    Ok(UserResponse::try_from(user)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn api_key_is_64_lowercase_hex() {
        let key = generate_api_key().unwrap();

        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn api_keys_do_not_repeat() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_api_key().unwrap()).collect();

        assert_eq!(keys.len(), 1000);
    }

    #[tokio::test]
    async fn created_user_can_be_found_by_its_key() {
        let pool = db::test_pool().await;

        let created = create_user(&pool, "Alice".to_string()).await.unwrap();
        let stored = db::get_user(&pool, &created.api_key).await.unwrap();
        let fetched = to_response(stored).unwrap();

        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.id, created.id);
        assert!(!fetched.id.is_empty());
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn empty_name_is_accepted() {
        let pool = db::test_pool().await;

        let created = create_user(&pool, String::new()).await.unwrap();

        assert_eq!(created.name, "");
    }

    #[tokio::test]
    async fn each_user_gets_its_own_key_and_id() {
        let pool = db::test_pool().await;

        let first = create_user(&pool, "Same".to_string()).await.unwrap();
        let second = create_user(&pool, "Same".to_string()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.api_key, second.api_key);
    }

    #[tokio::test]
    async fn insert_failure_is_create_user_error() {
        let pool = db::test_pool().await;
        sqlx::query("DROP TABLE users").execute(&pool).await.unwrap();

        let err = create_user(&pool, "Alice".to_string()).await.unwrap_err();

        assert!(matches!(err, AppError::CreateUser(_)));
    }

    #[tokio::test]
    async fn missing_row_after_insert_is_get_user_error() {
        let pool = db::test_pool().await;
        sqlx::query(
            "CREATE TRIGGER wipe AFTER INSERT ON users BEGIN DELETE FROM users WHERE id = NEW.id; END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = create_user(&pool, "Alice".to_string()).await.unwrap_err();

        assert!(matches!(err, AppError::GetUser(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn bad_stored_timestamp_is_mapping_error() {
        let user = User {
            id: "id".to_string(),
            created_at: "not a time".to_string(),
            updated_at: "not a time".to_string(),
            name: "Alice".to_string(),
            api_key: "ab".repeat(32),
        };

        assert!(matches!(
            to_response(user),
            Err(AppError::ResponseMapping(_))
        ));
    }
}
