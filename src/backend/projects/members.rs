//! Project Membership
//!
//! A user holds at most one role per project. Adding an existing member
//! updates their role in place; replacing the team is a single transaction.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::backend::projects::types::{MemberAssignment, ProjectMember};
use crate::shared::ProjectRole;

const SELECT_MEMBER: &str = r#"
    SELECT m.id, m.project_id, m.user_id, m.role,
           u.email AS user_email, u.full_name AS user_full_name, m.created_at
    FROM project_members m
    JOIN users u ON u.id = m.user_id
"#;

/// Insert or re-role a membership on any executor (pool or transaction)
async fn write_membership<'e, E>(
    executor: E,
    project_id: i64,
    user_id: i64,
    role: ProjectRole,
) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO project_members (project_id, user_id, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(project_id, user_id) DO UPDATE SET
            role = excluded.role,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(project_id)
    .bind(user_id)
    .bind(role.as_str())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Add a member, or change the role of an existing one
pub async fn upsert_member(
    pool: &SqlitePool,
    project_id: i64,
    user_id: i64,
    role: ProjectRole,
) -> Result<ProjectMember, sqlx::Error> {
    write_membership(pool, project_id, user_id, role).await?;
    get_member(pool, project_id, user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_member(
    pool: &SqlitePool,
    project_id: i64,
    user_id: i64,
) -> Result<Option<ProjectMember>, sqlx::Error> {
    sqlx::query_as::<_, ProjectMember>(&format!(
        "{SELECT_MEMBER} WHERE m.project_id = ? AND m.user_id = ?"
    ))
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Members of a project in the order they were added
pub async fn list_members(pool: &SqlitePool, project_id: i64) -> Result<Vec<ProjectMember>, sqlx::Error> {
    sqlx::query_as::<_, ProjectMember>(&format!(
        "{SELECT_MEMBER} WHERE m.project_id = ? ORDER BY m.id"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await
}

/// Remove a membership. Returns `false` if the user was not a member.
pub async fn remove_member(pool: &SqlitePool, project_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM project_members WHERE project_id = ? AND user_id = ?")
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Replace the whole team of a project
///
/// Either every assignment is applied or none is. A user listed twice keeps
/// the last role given.
pub async fn replace_team(
    pool: &SqlitePool,
    project_id: i64,
    members: &[MemberAssignment],
) -> Result<Vec<ProjectMember>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM project_members WHERE project_id = ?")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

    for member in members {
        write_membership(&mut *tx, project_id, member.user_id, member.role).await?;
    }

    tx.commit().await?;
    list_members(pool, project_id).await
}
