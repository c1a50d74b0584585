/**
 * Project Handlers
 *
 * # Endpoints
 *
 * - GET    /api/projects                        - admin: all; others: member projects
 * - GET    /api/projects/statistics             - admin
 * - POST   /api/projects                        - admin, 201
 * - GET    /api/projects/{id}                   - detail with members and file count
 * - PATCH  /api/projects/{id}                   - admin
 * - DELETE /api/projects/{id}                   - admin; members, files and blobs go too
 * - POST   /api/projects/{id}/team              - admin; replaces the whole team
 * - GET    /api/projects/{id}/members
 * - POST   /api/projects/{id}/members           - admin; re-adding changes the role
 * - DELETE /api/projects/{id}/members/{user_id} - admin
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::auth::permissions::is_admin;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AdminUser, AuthUser};
use crate::backend::projects::access::fetch_accessible_project;
use crate::backend::projects::db;
use crate::backend::projects::members;
use crate::backend::projects::types::{
    CreateProjectRequest, MemberAssignment, Project, ProjectDetail, ProjectMember,
    ProjectStatistics, TeamAssignment, UpdateProjectRequest,
};
use crate::backend::server::state::AppState;
use crate::backend::storage::project_prefix;
use crate::shared::Pagination;

fn validate_name(name: &str) -> BackendResult<()> {
    if name.trim().is_empty() {
        return Err(BackendError::validation("Project name is required"));
    }
    Ok(())
}

async fn require_project_exists(app_state: &AppState, project_id: i64) -> BackendResult<Project> {
    db::get_project(&app_state.db_pool, project_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Project not found"))
}

pub async fn list_projects(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(page): Query<Pagination>,
) -> BackendResult<Json<Vec<Project>>> {
    let projects = if is_admin(&user) {
        db::list_projects(&app_state.db_pool, page.skip(), page.limit()).await?
    } else {
        db::list_projects_for_member(&app_state.db_pool, user.id, page.skip(), page.limit()).await?
    };
    Ok(Json(projects))
}

pub async fn project_statistics(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> BackendResult<Json<ProjectStatistics>> {
    Ok(Json(db::project_statistics(&app_state.db_pool).await?))
}

pub async fn create_project(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateProjectRequest>,
) -> BackendResult<(StatusCode, Json<Project>)> {
    validate_name(&request.name)?;

    let project = db::create_project(
        &app_state.db_pool,
        request.name.trim(),
        request.description.as_deref(),
        admin.id,
    )
    .await?;

    tracing::info!("Admin {} created project {} '{}'", admin.id, project.id, project.name);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> BackendResult<Json<ProjectDetail>> {
    let project = fetch_accessible_project(&app_state.db_pool, &user, project_id).await?;
    let members = members::list_members(&app_state.db_pool, project.id).await?;
    let file_count = db::file_count(&app_state.db_pool, project.id).await?;

    Ok(Json(ProjectDetail {
        project,
        members,
        file_count,
    }))
}

pub async fn update_project(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i64>,
    Json(mut changes): Json<UpdateProjectRequest>,
) -> BackendResult<Json<Project>> {
    if let Some(name) = changes.name.as_mut() {
        validate_name(name)?;
        *name = name.trim().to_string();
    }
    if changes.word_count.is_some_and(|count| count < 0) {
        return Err(BackendError::validation("Word count cannot be negative"));
    }

    let project = db::update_project(&app_state.db_pool, project_id, &changes)
        .await?
        .ok_or_else(|| BackendError::not_found("Project not found"))?;

    tracing::info!("Admin {} updated project {}", admin.id, project.id);
    Ok(Json(project))
}

/// Delete a project
///
/// The row goes first and takes members and file rows with it; the blob
/// prefix is cleaned up afterwards. A blob that cannot be removed is logged
/// and left behind rather than failing the request.
pub async fn delete_project(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i64>,
) -> BackendResult<StatusCode> {
    if !db::delete_project(&app_state.db_pool, project_id).await? {
        return Err(BackendError::not_found("Project not found"));
    }

    let blobs = app_state.storage.list(&project_prefix(project_id)).await?;
    for path in &blobs {
        if let Err(e) = app_state.storage.delete(path).await {
            tracing::warn!("Failed to remove blob {} of deleted project {}: {}", path, project_id, e);
        }
    }

    tracing::info!(
        "Admin {} deleted project {} ({} blobs removed)",
        admin.id,
        project_id,
        blobs.len()
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the team of a project
///
/// # Errors
///
/// * `404 Not Found` - project missing, or any listed user missing (nothing is changed)
pub async fn assign_team(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i64>,
    Json(team): Json<TeamAssignment>,
) -> BackendResult<Json<Vec<ProjectMember>>> {
    require_project_exists(&app_state, project_id).await?;

    for member in &team.members {
        if get_user_by_id(&app_state.db_pool, member.user_id).await?.is_none() {
            return Err(BackendError::not_found(format!("User {} not found", member.user_id)));
        }
    }

    let team = members::replace_team(&app_state.db_pool, project_id, &team.members).await?;
    tracing::info!(
        "Admin {} assigned {} members to project {}",
        admin.id,
        team.len(),
        project_id
    );
    Ok(Json(team))
}

pub async fn list_members(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> BackendResult<Json<Vec<ProjectMember>>> {
    let project = fetch_accessible_project(&app_state.db_pool, &user, project_id).await?;
    Ok(Json(members::list_members(&app_state.db_pool, project.id).await?))
}

pub async fn add_member(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(project_id): Path<i64>,
    Json(assignment): Json<MemberAssignment>,
) -> BackendResult<Json<ProjectMember>> {
    require_project_exists(&app_state, project_id).await?;
    if get_user_by_id(&app_state.db_pool, assignment.user_id).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    let member =
        members::upsert_member(&app_state.db_pool, project_id, assignment.user_id, assignment.role)
            .await?;

    tracing::info!(
        "Admin {} set user {} as {} on project {}",
        admin.id,
        member.user_id,
        member.role.as_str(),
        project_id
    );
    Ok(Json(member))
}

pub async fn remove_member(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path((project_id, user_id)): Path<(i64, i64)>,
) -> BackendResult<StatusCode> {
    if !members::remove_member(&app_state.db_pool, project_id, user_id).await? {
        return Err(BackendError::not_found("Member not found in project"));
    }

    tracing::info!("Admin {} removed user {} from project {}", admin.id, user_id, project_id);
    Ok(StatusCode::NO_CONTENT)
}
