//! Database connection pool, migrations and user queries.

use crate::models::user::{NewUser, User};
use sqlx::{Pool, Sqlite};

/// Type alias for the SQLite connection pool shared by all handlers.
pub type DbPool = Pool<Sqlite>;

/// Create a new SQLite connection pool.
///
/// In-memory databases are private to the connection that opened them, so
/// for those URLs the pool is pinned to a single connection that never
/// expires. File databases get up to 5 connections.
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the database
/// file cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = sqlx::sqlite::SqlitePoolOptions::new();

    let options = if is_in_memory(database_url) {
        options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options.max_connections(5)
    };

    options.connect(database_url).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Run database migrations from the `migrations/` directory.
///
/// Applied migrations are tracked in `_sqlx_migrations`, so each one runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Insert a new user row.
///
/// Uniqueness of `id` and `api_key` is enforced by the schema.
pub async fn create_user(pool: &DbPool, user: &NewUser) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, created_at, updated_at, name, api_key)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .bind(&user.name)
    .bind(&user.api_key)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the user owning `api_key`.
///
/// Returns `sqlx::Error::RowNotFound` when no user matches.
pub async fn get_user(pool: &DbPool, api_key: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, created_at, updated_at, name, api_key
        FROM users
        WHERE api_key = ?
        "#,
    )
    .bind(api_key)
    .fetch_one(pool)
    .await
}

/// In-memory pool with migrations applied.
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(api_key: &str) -> NewUser {
        NewUser {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
            name: "Alice".to_string(),
            api_key: api_key.to_string(),
        }
    }

    #[tokio::test]
    async fn inserted_user_is_found_by_api_key() {
        let pool = test_pool().await;
        let new_user = sample("key-one");

        create_user(&pool, &new_user).await.unwrap();
        let user = get_user(&pool, "key-one").await.unwrap();

        assert_eq!(user.id, new_user.id);
        assert_eq!(user.name, "Alice");
        assert_eq!(user.created_at, "2025-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn unknown_api_key_is_row_not_found() {
        let pool = test_pool().await;

        let err = get_user(&pool, "nope").await.unwrap_err();

        assert!(matches!(err, sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn duplicate_api_key_is_rejected() {
        let pool = test_pool().await;

        create_user(&pool, &sample("dup")).await.unwrap();

        assert!(create_user(&pool, &sample("dup")).await.is_err());
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:users?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://users.db?mode=rwc"));
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_schema_across_queries() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        assert_eq!(pool.options().get_max_connections(), 1);
        for key in ["a", "b", "c", "d", "e", "f"] {
            create_user(&pool, &sample(key)).await.unwrap();
        }
        for key in ["a", "b", "c", "d", "e", "f"] {
            assert_eq!(get_user(&pool, key).await.unwrap().api_key, key);
        }
    }
}
