/**
 * Registration Handler
 *
 * POST /api/auth/register
 *
 * Self-service sign-up always yields a `writer`; other roles are assigned
 * by an admin through the users endpoints.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{
    validate_email, validate_full_name, validate_password, RegisterRequest, UserResponse,
};
use crate::backend::auth::users::{create_user, is_unique_violation};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::RoleName;

/// Registration handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid email, short password, or email already registered
/// * `500 Internal Server Error` - hashing or database failure
pub async fn register(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<(StatusCode, Json<UserResponse>)> {
    tracing::info!("Registration request for: {}", request.email);

    validate_email(&request.email)?;
    validate_password(&request.password)?;
    validate_full_name(&request.full_name)?;

    let hashed = bcrypt::hash(&request.password, app_state.settings.password_hash_cost)?;

    let user = create_user(
        &app_state.db_pool,
        &request.email,
        &hashed,
        request.full_name.trim(),
        RoleName::Writer,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            tracing::warn!("Registration with existing email: {}", request.email);
            BackendError::validation("Email already registered")
        } else {
            BackendError::Database(e)
        }
    })?;

    tracing::info!("User registered: {} (id {})", user.email, user.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
