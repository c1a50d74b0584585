use serde::{Deserialize, Serialize};

use crate::backend::auth::users::UserChanges;
use crate::shared::RoleName;

/// Admin-created account; role defaults to `writer`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role_name: RoleName,
}

fn default_role() -> RoleName {
    RoleName::Writer
}

/// Partial account update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role_name: Option<RoleName>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            full_name: request.full_name,
            role: request.role_name,
            is_active: request.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_writer() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"email": "a@b.c", "password": "password123", "full_name": "A"}"#,
        )
        .unwrap();
        assert_eq!(request.role_name, RoleName::Writer);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = serde_json::from_str::<UpdateUserRequest>(r#"{"role_name": "owner"}"#);
        assert!(result.is_err());
    }
}
