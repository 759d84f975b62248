//! User accounts and password credentials

use crate::error::is_unique_violation;
use crate::{from_unix, Result, StorageError};
use sqlx::SqlitePool;
use vibe_core::types::{User, UserId};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    created_at: i64,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        Ok(User {
            id: UserId::new(self.id),
            email: self.email,
            created_at: from_unix(self.created_at)?,
        })
    }
}

/// A user together with the stored password hash, for login checks
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Create a user
///
/// The email is stored exactly as given; callers normalize it first.
///
/// # Errors
///
/// Returns `StorageError::Duplicate` if the email is already registered
pub async fn create(pool: &SqlitePool, email: &str, password_hash: &str) -> Result<User> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::duplicate("user", email)
        } else {
            StorageError::Database(e)
        }
    })?;

    Ok(User {
        id: UserId::new(result.last_insert_rowid()),
        email: email.to_string(),
        created_at: from_unix(now)?,
    })
}

/// Get a user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(UserRow::into_user).transpose()
}

/// Get a user and their password hash by email
pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        let password_hash = r.password_hash.clone();
        Ok(UserCredentials {
            user: r.into_user()?,
            password_hash,
        })
    })
    .transpose()
}

/// Get the stored password hash for a user
pub async fn get_password_hash(pool: &SqlitePool, id: UserId) -> Result<Option<String>> {
    let hash: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(hash.map(|(h,)| h))
}

/// Delete a user; observations and their tracks cascade
///
/// Returns `false` if no such user existed.
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows: Vec<UserRow> = sqlx::query_as(
        "SELECT id, email, password_hash, created_at FROM users ORDER BY email",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(UserRow::into_user).collect()
}
