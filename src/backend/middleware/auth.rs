/**
 * Authentication Middleware
 *
 * Protected routes sit behind `auth_middleware`, which resolves the bearer
 * token to a fresh `User` row and stores it in the request extensions.
 * Handlers then take `AuthUser` or `AdminUser` as an argument.
 *
 * The user is re-read from the database on every request so that role
 * changes and deactivation apply to tokens that were already issued.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::permissions::require_admin;
use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve a token to an active user
///
/// # Errors
///
/// * `Authentication` - token invalid or expired, or the user no longer exists
/// * `Authorization` - the user is deactivated
pub async fn authenticate_token(state: &AppState, token: &str) -> BackendResult<User> {
    let claims = verify_token(&state.settings, token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::authentication("Invalid or expired token")
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Token subject is not a user id: {}", claims.sub);
        BackendError::authentication("Invalid token payload")
    })?;

    let user = get_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {}", user_id);
            BackendError::authentication("User not found")
        })?;

    if !user.is_active {
        tracing::warn!("Disabled user {} attempted access", user.id);
        return Err(BackendError::authorization("User account is disabled"));
    }

    Ok(user)
}

/// Authentication middleware
///
/// Returns 401 if the token is missing or invalid and 403 if the account is
/// disabled; otherwise attaches the `User` to the request.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers())
        .map(str::to_owned)
        .ok_or_else(|| BackendError::authentication("Not authenticated"))?;

    let user = authenticate_token(&app_state, &token).await?;
    tracing::debug!("Authenticated user {} for {}", user.id, request.uri().path());

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// The authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("User not found in request extensions");
                BackendError::authentication("Not authenticated")
            })
    }
}

/// The authenticated caller, required to be an admin
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_admin(&user)?;
        Ok(AdminUser(user))
    }
}
