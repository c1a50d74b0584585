//! Route Configuration Module
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports
//! ├── router.rs       - create_router, layers, fallback
//! ├── api_routes.rs   - auth, users, projects, files, storage
//! └── chat_routes.rs  - chat and the chat websocket
//! ```
//!
//! Everything except `/health` lives under `/api`. Login, register and the
//! websocket handshake are reachable without an `Authorization` header;
//! the rest run behind `auth_middleware`.

/// Main router creation
pub mod router;

/// Chat routes
pub mod chat_routes;

/// Resource routes
pub mod api_routes;

pub use router::create_router;
