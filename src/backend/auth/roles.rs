/**
 * Role Records
 *
 * The three global roles are seeded at startup with fixed permission sets
 * and are not edited afterwards. Permissions are stored as a JSON array of
 * `resource:action` strings.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{types::Json, SqlitePool};

use crate::shared::RoleName;

pub const PERM_PROJECTS_CREATE: &str = "projects:create";
pub const PERM_PROJECTS_READ: &str = "projects:read";
pub const PERM_PROJECTS_UPDATE: &str = "projects:update";
pub const PERM_PROJECTS_DELETE: &str = "projects:delete";
pub const PERM_PROJECTS_ASSIGN_TEAM: &str = "projects:assign_team";
pub const PERM_USERS_CREATE: &str = "users:create";
pub const PERM_USERS_READ: &str = "users:read";
pub const PERM_USERS_UPDATE: &str = "users:update";
pub const PERM_USERS_DELETE: &str = "users:delete";
pub const PERM_FILES_CREATE: &str = "files:create";
pub const PERM_FILES_READ: &str = "files:read";
pub const PERM_FILES_UPDATE: &str = "files:update";
pub const PERM_FILES_DELETE: &str = "files:delete";
pub const PERM_AI_USE: &str = "ai:use";

/// Role row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    #[sqlx(try_from = "String")]
    pub name: RoleName,
    pub description: Option<String>,
    pub permissions: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Permission set granted to a role when it is seeded
pub fn default_permissions(role: RoleName) -> Vec<&'static str> {
    match role {
        RoleName::Admin => vec![
            PERM_PROJECTS_CREATE,
            PERM_PROJECTS_READ,
            PERM_PROJECTS_UPDATE,
            PERM_PROJECTS_DELETE,
            PERM_PROJECTS_ASSIGN_TEAM,
            PERM_USERS_CREATE,
            PERM_USERS_READ,
            PERM_USERS_UPDATE,
            PERM_USERS_DELETE,
            PERM_FILES_CREATE,
            PERM_FILES_READ,
            PERM_FILES_UPDATE,
            PERM_FILES_DELETE,
            PERM_AI_USE,
        ],
        RoleName::Writer => vec![
            PERM_PROJECTS_READ,
            PERM_FILES_CREATE,
            PERM_FILES_READ,
            PERM_FILES_UPDATE,
            PERM_AI_USE,
        ],
        RoleName::Statistician => vec![PERM_PROJECTS_READ, PERM_FILES_READ, PERM_AI_USE],
    }
}

/// Look up a role by name
pub async fn get_role_by_name(pool: &SqlitePool, name: RoleName) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        r#"
        SELECT id, name, description, permissions, created_at, updated_at
        FROM roles
        WHERE name = ?
        "#,
    )
    .bind(name.as_str())
    .fetch_optional(pool)
    .await
}

/// Insert a role if no role with that name exists yet
///
/// Returns `true` if a row was inserted.
pub async fn insert_role_if_missing(pool: &SqlitePool, name: RoleName) -> Result<bool, sqlx::Error> {
    let now = Utc::now();
    let permissions: Vec<String> = default_permissions(name).into_iter().map(String::from).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO roles (name, description, permissions, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(name) DO NOTHING
        "#,
    )
    .bind(name.as_str())
    .bind(name.description())
    .bind(Json(permissions))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
