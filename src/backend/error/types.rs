/**
 * Backend Error Types
 *
 * Every fallible handler returns `Result<_, BackendError>`. Each variant maps
 * onto one HTTP status code; infrastructure failures (database, storage,
 * internal) are logged where they are rendered and reach the client only as a
 * generic message.
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * - `Authentication` (401) - missing, malformed or expired bearer token
 * - `Authorization` (403) - authenticated but not allowed
 * - `NotFound` (404) - resource absent, or not visible under this project
 * - `VersionConflict` (409) - optimistic-lock rejection, carries the server version
 * - `Validation` (400) - malformed input
 * - `Decoding` (400) - stored bytes are not valid UTF-8
 * - `PayloadTooLarge` (413) - upload over `MAX_UPLOAD_BYTES`
 *
 * ## Server Errors
 *
 * - `Timeout` (504) - model generation exceeded the turn budget
 * - `Unavailable` (503) - model provider failed
 * - `Database`, `Storage`, `Internal` (500)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::llm::ModelError;
use crate::backend::storage::StorageError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Not authorized: {message}")]
    Authorization { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The submitted version was not strictly greater than the stored one
    #[error(
        "Version conflict. Server version is {current}, your version is {submitted}. Download the latest version first."
    )]
    VersionConflict { current: i64, submitted: i64 },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Decoding failed: {message}")]
    Decoding { message: String },

    #[error("Payload too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Timed out: {message}")]
    Timeout { message: String },

    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BackendError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(current: i64, submitted: i64) -> Self {
        Self::VersionConflict { current, submitted }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    pub fn too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::Authorization { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::VersionConflict { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } | Self::Decoding { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::SharedError(SharedError::Validation { .. }) => StatusCode::BAD_REQUEST,
            Self::SharedError(SharedError::UnknownValue { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Storage(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the client
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message }
            | Self::Authorization { message }
            | Self::NotFound { message }
            | Self::Validation { message }
            | Self::Decoding { message }
            | Self::PayloadTooLarge { message }
            | Self::Timeout { message }
            | Self::Unavailable { message } => message.clone(),
            Self::VersionConflict { .. } => self.to_string(),
            Self::SharedError(SharedError::Validation { message, .. }) => message.clone(),
            Self::Storage(StorageError::NotFound(_)) => "File content not found".to_string(),
            Self::Storage(StorageError::InvalidPath(_)) => "Invalid storage path".to_string(),
            Self::SharedError(_) | Self::Database(_) | Self::Storage(_) | Self::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    /// Whether the failure is on the server side and worth logging at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<ModelError> for BackendError {
    fn from(err: ModelError) -> Self {
        tracing::error!("Model provider failed: {}", err);
        Self::unavailable("The assistant is unavailable, try again later")
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal(format!("password hashing failed: {}", err))
    }
}
