/**
 * User Administration Handlers
 *
 * Every handler takes `AdminUser`, so non-admins are rejected with 403
 * before any lookup happens.
 *
 * # Endpoints
 *
 * - GET    /api/users               - page through all users
 * - GET    /api/users/writers       - active writers (for team pickers)
 * - GET    /api/users/statisticians - active statisticians
 * - POST   /api/users               - create an account with any role
 * - GET    /api/users/{id}
 * - PATCH  /api/users/{id}
 * - DELETE /api/users/{id}          - self-deletion is refused
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::auth::handlers::types::{
    validate_email, validate_full_name, validate_password, UserResponse,
};
use crate::backend::auth::users::{self, is_foreign_key_violation, is_unique_violation, UserChanges};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AdminUser;
use crate::backend::server::state::AppState;
use crate::backend::users::types::{CreateUserRequest, UpdateUserRequest};
use crate::shared::{Pagination, RoleName};

fn email_taken(err: sqlx::Error) -> BackendError {
    if is_unique_violation(&err) {
        BackendError::validation("Email already registered")
    } else {
        BackendError::Database(err)
    }
}

pub async fn list_users(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(page): Query<Pagination>,
) -> BackendResult<Json<Vec<UserResponse>>> {
    let rows = users::list_users(&app_state.db_pool, page.skip(), page.limit()).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn list_writers(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> BackendResult<Json<Vec<UserResponse>>> {
    let rows = users::list_active_users_by_role(&app_state.db_pool, RoleName::Writer).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn list_statisticians(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> BackendResult<Json<Vec<UserResponse>>> {
    let rows = users::list_active_users_by_role(&app_state.db_pool, RoleName::Statistician).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

/// Create an account on behalf of someone else
///
/// # Errors
///
/// * `400 Bad Request` - invalid input or email already registered
pub async fn create_user(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateUserRequest>,
) -> BackendResult<(StatusCode, Json<UserResponse>)> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    validate_full_name(&request.full_name)?;

    let hashed = bcrypt::hash(&request.password, app_state.settings.password_hash_cost)?;
    let user = users::create_user(
        &app_state.db_pool,
        &request.email,
        &hashed,
        request.full_name.trim(),
        request.role_name,
    )
    .await
    .map_err(email_taken)?;

    tracing::info!(
        "Admin {} created user {} ({}) as {}",
        admin.id,
        user.id,
        user.email,
        user.role_name.as_str()
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn get_user(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<i64>,
) -> BackendResult<Json<UserResponse>> {
    let user = users::get_user_by_id(&app_state.db_pool, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(user)))
}

/// Change email, name, role or active flag
pub async fn update_user(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> BackendResult<Json<UserResponse>> {
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if let Some(full_name) = &request.full_name {
        validate_full_name(full_name)?;
    }

    let changes = UserChanges::from(request);
    let user = users::update_user(&app_state.db_pool, user_id, &changes)
        .await
        .map_err(email_taken)?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("Admin {} updated user {}", admin.id, user.id);
    Ok(Json(UserResponse::from(user)))
}

/// Delete an account
///
/// Memberships go with the user. A user who still created projects or
/// uploaded files cannot be deleted until those are removed.
pub async fn delete_user(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> BackendResult<StatusCode> {
    if user_id == admin.id {
        return Err(BackendError::validation("Cannot delete your own account"));
    }

    let deleted = users::delete_user(&app_state.db_pool, user_id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                BackendError::validation("User still owns projects or files")
            } else {
                BackendError::Database(e)
            }
        })?;

    if !deleted {
        return Err(BackendError::not_found("User not found"));
    }

    tracing::info!("Admin {} deleted user {}", admin.id, user_id);
    Ok(StatusCode::NO_CONTENT)
}
