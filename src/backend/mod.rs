//! Backend Module
//!
//! The Axum server: authentication, users, projects, versioned files and
//! the assistant chat, over SQLite and a pluggable blob store.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Startup, application state, seeding
//! ├── routes/         - Router assembly and layers
//! ├── error/          - BackendError and its HTTP rendering
//! ├── auth/           - Roles, users, JWT sessions, permission evaluator
//! ├── middleware/     - Bearer-token authentication
//! ├── users/          - Admin user management
//! ├── projects/       - Projects and membership
//! ├── files/          - Versioned project files
//! ├── storage/        - StorageBackend trait and the local implementation
//! ├── llm/            - ModelProvider trait and the demo model
//! └── chat/           - Chat endpoints and the websocket session
//! ```
//!
//! # State
//!
//! Handlers share one `AppState`: the SQLite pool, the storage backend, the
//! model provider and the validated settings. There is no other mutable
//! process-wide state; membership and permissions are read from the
//! database on every request.
//!
//! # Errors
//!
//! Handlers return `BackendResult<T>`. `BackendError` renders as
//! `{"error": ..., "status": ...}` with the matching status code, and adds
//! `current_version` to version conflicts.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Admin user management
pub mod users;

/// Projects and project membership
pub mod projects;

/// Versioned project files
pub mod files;

/// Blob storage backends
pub mod storage;

/// Language model providers
pub mod llm;

/// Assistant chat
pub mod chat;

/// Test fixtures
#[cfg(test)]
pub mod testing;

pub use error::{BackendError, BackendResult};
pub use server::create_app;
