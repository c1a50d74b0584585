//! Files Module
//!
//! Versioned project files: metadata rows in SQLite, content in the storage
//! backend.
//!
//! # Module Structure
//!
//! ```text
//! files/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Rows, responses, filename rules
//! ├── db.rs        - Metadata queries, conditional version bump
//! ├── service.rs   - FileStore: create, upload, read, optimistic update, delete
//! └── handlers.rs  - HTTP handlers and multipart parsing
//! ```

pub mod types;

pub mod db;

pub mod service;

pub mod handlers;

pub use service::FileStore;
pub use types::{FileRecord, FileResponse};
