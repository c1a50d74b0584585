//! Backend Error Module
//!
//! Error types for the HTTP layer and their conversion into responses.
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - BackendError and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias used by handlers and services
pub type BackendResult<T> = Result<T, BackendError>;
