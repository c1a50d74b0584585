/**
 * User Model and Database Operations
 *
 * Users are always loaded together with their role so the permission
 * evaluator can run without a second query.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{types::Json, SqlitePool};

use crate::shared::RoleName;

/// User joined with its global role
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: String,
    pub role_id: i64,
    #[sqlx(try_from = "String")]
    pub role_name: RoleName,
    /// Permission strings granted by the role
    pub permissions: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.email, u.hashed_password, u.full_name, u.role_id,
           r.name AS role_name, r.permissions AS permissions,
           u.is_active, u.created_at, u.updated_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

/// Fields to change on an existing user; `None` leaves a column untouched
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<RoleName>,
    pub is_active: Option<bool>,
}

/// Create a new user with the given global role
///
/// # Errors
/// `sqlx::Error::RowNotFound` if the role has not been seeded; a unique
/// violation if the email is taken.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    hashed_password: &str,
    full_name: &str,
    role: RoleName,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (email, hashed_password, full_name, role_id, is_active, created_at, updated_at)
        SELECT ?, ?, ?, r.id, 1, ?, ?
        FROM roles r
        WHERE r.name = ?
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(hashed_password)
    .bind(full_name)
    .bind(now)
    .bind(now)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    get_user_by_id(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE u.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get user by email
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE u.email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Page through all users, oldest first
pub async fn list_users(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY u.id LIMIT ? OFFSET ?"))
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await
}

/// Active users holding a given global role
pub async fn list_active_users_by_role(
    pool: &SqlitePool,
    role: RoleName,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "{SELECT_USER} WHERE r.name = ? AND u.is_active = 1 ORDER BY u.full_name"
    ))
    .bind(role.as_str())
    .fetch_all(pool)
    .await
}

/// Apply `changes` to a user
///
/// Returns `None` if the user does not exist.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    changes: &UserChanges,
) -> Result<Option<User>, sqlx::Error> {
    let role_name = changes.role.map(|role| role.as_str());

    let result = sqlx::query(
        r#"
        UPDATE users SET
            email = COALESCE(?, email),
            full_name = COALESCE(?, full_name),
            role_id = COALESCE((SELECT id FROM roles WHERE name = ?), role_id),
            is_active = COALESCE(?, is_active),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.email.as_deref())
    .bind(changes.full_name.as_deref())
    .bind(role_name)
    .bind(changes.is_active)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user_by_id(pool, id).await
}

/// Delete a user
///
/// Returns `false` if no such user existed.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Whether an error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Whether an error is a FOREIGN KEY constraint violation
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
