//! GET /api/auth/me
//!
//! The middleware has already resolved the token, so this only shapes the
//! response.

use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::AuthUser;

/// Current user handler
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    tracing::debug!("Returning profile for user {}", user.id);
    Json(UserResponse::from(user))
}
