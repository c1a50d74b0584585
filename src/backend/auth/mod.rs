//! Authentication Module
//!
//! Identity, roles, tokens and the permission evaluator.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── roles.rs        - Role records and seeded permission sets
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! ├── permissions.rs  - Global and per-project authorization decisions
//! └── handlers/       - HTTP handlers (register, login, me)
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, password, full name → `writer` account created
//! 2. **Login**: credentials verified → JWT access token returned
//! 3. **Requests**: bearer token verified by middleware → `User` reloaded from the database

/// Role records and permission sets
pub mod roles;

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Authorization decisions
pub mod permissions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_me, login, register};
pub use handlers::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
pub use users::User;
