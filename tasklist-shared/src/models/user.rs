/// User model and database operations
///
/// This module provides the User model and the store operations needed for
/// registration and login. Users are never updated through the API; the
/// only exposed lifecycle is creation. Deleting a user is a direct store
/// operation and cascades to every task the user owns.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     first_name TEXT NOT NULL,
///     last_name TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Usernames are case-sensitive: `alice` and `Alice` are distinct accounts.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "Alice".to_string(),
///     last_name: None,
/// }).await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (store-assigned)
    pub id: i64,

    /// Unique username (case-sensitive, immutable)
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing)] // Never expose the hash in API responses
    pub password_hash: String,

    /// Required first name
    pub first_name: String,

    /// Optional last name
    pub last_name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// First name
    pub first_name: String,

    /// Optional last name
    pub last_name: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username is already taken (unique constraint
    /// violation) or the insert otherwise fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, first_name, last_name, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact, case-sensitive match)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user
    ///
    /// Not exposed through any endpoint. All tasks owned by the user are
    /// deleted by the `ON DELETE CASCADE` foreign key.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$secret".to_string(),
            first_name: "Alice".to_string(),
            last_name: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
