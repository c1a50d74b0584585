//! Database operations for file metadata

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::backend::files::types::{FileRecord, NewFile};

const SELECT_FILE: &str = r#"
    SELECT f.id, f.project_id, f.filename, f.original_filename, f.storage_path,
           f.content_type, f.size, f.uploaded_by,
           COALESCE(u.full_name, 'Unknown') AS uploader_name,
           f.version, f.created_at, f.updated_at
    FROM files f
    LEFT JOIN users u ON u.id = f.uploaded_by
"#;

/// Insert a metadata row at version 0
pub async fn insert_file(pool: &SqlitePool, new: &NewFile<'_>) -> Result<FileRecord, sqlx::Error> {
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO files (project_id, filename, original_filename, storage_path,
                           content_type, size, uploaded_by, version, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING id
        "#,
    )
    .bind(new.project_id)
    .bind(new.filename)
    .bind(new.original_filename)
    .bind(new.storage_path)
    .bind(new.content_type)
    .bind(new.size)
    .bind(new.uploaded_by)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get_file(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_file(pool: &SqlitePool, id: i64) -> Result<Option<FileRecord>, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(&format!("{SELECT_FILE} WHERE f.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// A file, only if it belongs to `project_id`
pub async fn get_project_file(
    pool: &SqlitePool,
    project_id: i64,
    file_id: i64,
) -> Result<Option<FileRecord>, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(&format!(
        "{SELECT_FILE} WHERE f.id = ? AND f.project_id = ?"
    ))
    .bind(file_id)
    .bind(project_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_file_by_storage_path(
    pool: &SqlitePool,
    storage_path: &str,
) -> Result<Option<FileRecord>, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(&format!("{SELECT_FILE} WHERE f.storage_path = ?"))
        .bind(storage_path)
        .fetch_optional(pool)
        .await
}

/// Files of a project in upload order
pub async fn list_project_files(pool: &SqlitePool, project_id: i64) -> Result<Vec<FileRecord>, sqlx::Error> {
    sqlx::query_as::<_, FileRecord>(&format!(
        "{SELECT_FILE} WHERE f.project_id = ? ORDER BY f.id"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await
}

/// Conditionally bump a file's version
///
/// Applies only when `version` is strictly greater than the stored one.
/// Returns the storage path on success and `None` when the row is missing
/// or the version check failed.
pub async fn advance_version<'e, E>(
    executor: E,
    project_id: i64,
    file_id: i64,
    version: i64,
    size: i64,
) -> Result<Option<String>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        r#"
        UPDATE files SET version = ?, size = ?, updated_at = ?
        WHERE id = ? AND project_id = ? AND version < ?
        RETURNING storage_path
        "#,
    )
    .bind(version)
    .bind(size)
    .bind(Utc::now())
    .bind(file_id)
    .bind(project_id)
    .bind(version)
    .fetch_optional(executor)
    .await
}

/// Stored version of a file in a project, if it exists
pub async fn current_version<'e, E>(
    executor: E,
    project_id: i64,
    file_id: i64,
) -> Result<Option<i64>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT version FROM files WHERE id = ? AND project_id = ?")
        .bind(file_id)
        .bind(project_id)
        .fetch_optional(executor)
        .await
}

pub async fn delete_file_row(pool: &SqlitePool, file_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM files WHERE id = ?")
        .bind(file_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
