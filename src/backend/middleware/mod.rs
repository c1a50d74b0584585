//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - bearer-token authentication and the `AuthUser` / `AdminUser` extractors

pub mod auth;

pub use auth::{auth_middleware, authenticate_token, bearer_token, AdminUser, AuthUser};
