//! Database operations for projects

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::backend::projects::types::{Project, ProjectStatistics, UpdateProjectRequest};
use crate::shared::ProjectStatus;

const SELECT_PROJECT: &str = r#"
    SELECT p.id, p.name, p.description, p.status, p.word_count, p.created_by,
           COALESCE(u.full_name, 'Unknown') AS creator_name,
           p.base_folder_path, p.created_at, p.updated_at
    FROM projects p
    LEFT JOIN users u ON u.id = p.created_by
"#;

/// Create a project in `draft` status
pub async fn create_project(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    created_by: i64,
) -> Result<Project, sqlx::Error> {
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO projects (name, description, status, word_count, created_by, created_at, updated_at)
        VALUES (?, ?, ?, 0, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(ProjectStatus::Draft.as_str())
    .bind(created_by)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get_project(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Get project by ID
pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!("{SELECT_PROJECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All projects, newest first
pub async fn list_projects(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        "{SELECT_PROJECT} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

/// Projects the user is a member of, newest first
pub async fn list_projects_for_member(
    pool: &SqlitePool,
    user_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        r#"{SELECT_PROJECT}
        JOIN project_members m ON m.project_id = p.id
        WHERE m.user_id = ?
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT ? OFFSET ?"#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

/// Apply a partial update
///
/// Returns `None` if the project does not exist.
pub async fn update_project(
    pool: &SqlitePool,
    id: i64,
    changes: &UpdateProjectRequest,
) -> Result<Option<Project>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE projects SET
            name = COALESCE(?, name),
            description = CASE WHEN ? THEN ? ELSE description END,
            status = COALESCE(?, status),
            base_folder_path = CASE WHEN ? THEN ? ELSE base_folder_path END,
            word_count = COALESCE(?, word_count),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.name.as_deref())
    .bind(changes.description.is_some())
    .bind(changes.description.clone().flatten())
    .bind(changes.status.map(|s| s.as_str()))
    .bind(changes.base_folder_path.is_some())
    .bind(changes.base_folder_path.clone().flatten())
    .bind(changes.word_count)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_project(pool, id).await
}

/// Delete a project; members and file rows cascade
pub async fn delete_project(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Count projects per status
pub async fn project_statistics(pool: &SqlitePool) -> Result<ProjectStatistics, sqlx::Error> {
    let rows = sqlx::query("SELECT status, COUNT(*) AS count FROM projects GROUP BY status")
        .fetch_all(pool)
        .await?;

    let mut stats = ProjectStatistics::default();
    for row in rows {
        let status: String = row.get("status");
        let count: i64 = row.get("count");
        stats.total += count;
        match ProjectStatus::from_str(&status) {
            Some(ProjectStatus::Draft) => stats.draft = count,
            Some(ProjectStatus::InProgress) => stats.in_progress = count,
            Some(ProjectStatus::UnderReview) => stats.under_review = count,
            Some(ProjectStatus::Completed) => stats.completed = count,
            None => tracing::warn!("Project row with unknown status '{}'", status),
        }
    }
    Ok(stats)
}

/// Number of files in a project
pub async fn file_count(pool: &SqlitePool, project_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE project_id = ?")
        .bind(project_id)
        .fetch_one(pool)
        .await
}
