//! Shared Error Types
//!
//! Errors raised below the HTTP layer. `Validation` comes from request
//! checks and is shown to the client. `UnknownValue` comes from decoding a
//! stored enum column and means the database holds something this build
//! does not understand.
//!
//! ```rust
//! use manuscript_workbench::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email address");
//! assert_eq!(error.to_string(), "email: Invalid email address");
//! ```

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

impl SharedError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }

    /// Message for the client, without the field prefix
    pub fn client_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message, .. } => Some(message),
            Self::UnknownValue { .. } => None,
        }
    }
}
