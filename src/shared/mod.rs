//! Shared Module
//!
//! Types that describe the public API surface and are independent of the
//! server runtime: role and status enums, chat wire frames, the settings
//! object, and validation errors. Client tooling can depend on these without
//! pulling in the backend.

/// Role and status enumerations
pub mod types;

/// Chat request, response and websocket event types
pub mod chat;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use types::{Pagination, ProjectRole, ProjectStatus, RoleName};
pub use chat::{ChatEvent, ChatRequest, ChatResponse, ModelInfo};
pub use error::SharedError;
pub use config::{ConfigError, ModelKind, Settings, SettingsBuilder, StorageKind};
