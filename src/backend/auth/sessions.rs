/**
 * Session Management and JWT Tokens
 *
 * Access tokens are HS256 JWTs signed with `Settings::secret_key`. The
 * subject is the numeric user id; the token carries no role information, so
 * role and active-flag changes take effect on the next request.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::Settings;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email at the time of issue
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// User id carried in `sub`, if it is numeric
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `settings` - Supplies the signing secret and token lifetime
/// * `user_id` - User ID
/// * `email` - User email
///
/// # Returns
/// JWT token string
pub fn create_token(
    settings: &Settings,
    user_id: i64,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_with_lifetime(
        settings,
        user_id,
        email,
        Duration::minutes(settings.access_token_expire_minutes),
    )
}

/// Create a token with an explicit lifetime (may be negative in tests)
pub fn create_token_with_lifetime(
    settings: &Settings,
    user_id: i64,
    email: &str,
    lifetime: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    };

    let key = EncodingKey::from_secret(settings.secret_key.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Errors
/// Fails on a bad signature, malformed token, or expiry.
pub fn verify_token(settings: &Settings, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(settings.secret_key.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}
