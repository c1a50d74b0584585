//! User Administration
//!
//! Admin-only management of accounts under `/api/users`. The data access
//! lives in `auth::users`; this module is the HTTP surface.

/// Request types
pub mod types;

/// HTTP handlers
pub mod handlers;

pub use types::{CreateUserRequest, UpdateUserRequest};
