//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types, input validation
//! ├── register.rs - User registration handler
//! ├── login.rs    - User authentication handler
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - create a `writer` account
//! - **`login`** - POST /api/auth/login - exchange credentials for a bearer token
//! - **`get_me`** - GET /api/auth/me - current user info
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens expire after `ACCESS_TOKEN_EXPIRE_MINUTES`
//! - Invalid credentials return 401 without revealing which part was wrong

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

pub use types::{LoginRequest, RegisterRequest, RoleResponse, TokenResponse, UserResponse};

pub use login::login;
pub use me::get_me;
pub use register::register;
