//! Project loaders guarded by the permission evaluator.
//!
//! Authorization runs before the project row is read: a caller without
//! access learns nothing about whether the id exists.

use sqlx::SqlitePool;

use crate::backend::auth::permissions::{require_project_access, require_write_access};
use crate::backend::auth::users::User;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::projects::db::get_project;
use crate::backend::projects::types::Project;

/// Load a project the user may read
///
/// # Errors
///
/// * `Authorization` - not an admin and not a member
/// * `NotFound` - the project does not exist
pub async fn fetch_accessible_project(
    pool: &SqlitePool,
    user: &User,
    project_id: i64,
) -> BackendResult<Project> {
    require_project_access(pool, user, project_id).await?;
    load(pool, project_id).await
}

/// Load a project the user may write files in
///
/// # Errors
///
/// * `Authorization` - not an admin and not a `writer` member
/// * `NotFound` - the project does not exist
pub async fn fetch_writable_project(
    pool: &SqlitePool,
    user: &User,
    project_id: i64,
) -> BackendResult<Project> {
    require_write_access(pool, user, project_id).await?;
    load(pool, project_id).await
}

async fn load(pool: &SqlitePool, project_id: i64) -> BackendResult<Project> {
    get_project(pool, project_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Project not found"))
}
