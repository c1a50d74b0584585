//! Manuscript Workbench - Main Library
//!
//! Backend for teams writing manuscripts together: user accounts with global
//! roles, projects with per-project membership, versioned manuscript files
//! kept in a blob store, and an assistant chat that streams model output over
//! a websocket.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared with clients
//!   - Role/status enums, chat wire frames, settings, validation errors
//!
//! - **`backend`** - The Axum server
//!   - Authentication and the permission evaluator
//!   - Projects, membership and files with optimistic versioning
//!   - Storage and model-provider capability traits
//!   - Streaming chat sessions
//!
//! # Usage
//!
//! ```rust,no_run
//! use manuscript_workbench::backend::server::create_app;
//! use manuscript_workbench::shared::Settings;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let app = create_app(settings).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
