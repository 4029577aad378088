/// Database models for Tasklist
///
/// This module contains the database models and their store operations.
///
/// # Models
///
/// - `user`: User accounts (registration, login lookup, cascade delete)
/// - `task`: Tasks and the filtered/paginated store queries behind listings
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
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
