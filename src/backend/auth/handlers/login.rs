/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Refuse disabled accounts
 * 4. Issue a JWT access token
 *
 * An unknown email and a wrong password produce the same 401 so accounts
 * cannot be enumerated.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown email or wrong password
/// * `403 Forbidden` - account disabled
/// * `500 Internal Server Error` - database or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {"email": "writer@example.com", "password": "password123"}
/// ```
///
/// # Example Response
///
/// ```json
/// {"access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...", "token_type": "bearer"}
/// ```
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<Json<TokenResponse>> {
    tracing::info!("Login request for: {}", request.email);

    let user = get_user_by_email(&app_state.db_pool, &request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            BackendError::authentication("Incorrect email or password")
        })?;

    if !verify(&request.password, &user.hashed_password)? {
        tracing::warn!("Invalid password for user: {}", request.email);
        return Err(BackendError::authentication("Incorrect email or password"));
    }

    if !user.is_active {
        tracing::warn!("Login attempt on disabled account: {}", request.email);
        return Err(BackendError::authorization("User account is disabled"));
    }

    let token = create_token(&app_state.settings, user.id, &user.email).map_err(|e| {
        BackendError::internal(format!("failed to create token: {}", e))
    })?;

    tracing::info!("User logged in successfully: {} (id {})", user.email, user.id);
    Ok(Json(TokenResponse::bearer(token)))
}
