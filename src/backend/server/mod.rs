//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database connection and migrations
//! ├── seed.rs         - Role and admin seeding
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Validation**: `Settings` are checked before anything is opened
//! 2. **Database**: SQLite pool is opened and migrated
//! 3. **Seeding**: roles and the admin account are inserted if missing
//! 4. **Services**: storage backend and model provider are constructed
//! 5. **Router Creation**: routes and middleware are configured
//!
//! # Example
//!
//! ```rust,no_run
//! use manuscript_workbench::backend::server::create_app;
//! use manuscript_workbench::shared::Settings;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let app = create_app(settings).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Database loading
pub mod config;

/// Startup seeding
pub mod seed;

/// Server initialization
pub mod init;

pub use init::{build_state, create_app, InitError};
pub use state::AppState;
