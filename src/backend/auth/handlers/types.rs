/**
 * Authentication Request and Response Types
 *
 * Also home to `UserResponse`, the public view of a user shared by the
 * `/auth/me` and `/users` endpoints.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;
use crate::shared::SharedError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Access token issued on login
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Role summary nested in a user response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<String>,
}

/// User as returned to clients (no password hash)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub role: RoleResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            role: RoleResponse {
                id: user.role_id,
                name: user.role_name.as_str().to_string(),
                permissions: user.permissions.0,
            },
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Reject addresses without a local part and a domain around one `@`
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(SharedError::validation("email", "Invalid email address")),
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), SharedError> {
    if full_name.trim().is_empty() {
        return Err(SharedError::validation("full_name", "Full name is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("writer@example.com").is_ok());
        assert!(validate_email("writer").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("writer@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_token_response_shape() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json, serde_json::json!({"access_token": "abc", "token_type": "bearer"}));
    }
}
