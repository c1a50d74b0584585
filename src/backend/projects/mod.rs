//! Projects Module
//!
//! Projects, their teams, and the access-guarded loaders the file and chat
//! modules build on.
//!
//! # Module Structure
//!
//! ```text
//! projects/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Rows and request bodies
//! ├── db.rs        - Project queries and statistics
//! ├── members.rs   - Membership upsert, removal, team replacement
//! ├── access.rs    - Project loaders behind the permission evaluator
//! └── handlers.rs  - HTTP handlers
//! ```

pub mod types;

pub mod db;

pub mod members;

pub mod access;

pub mod handlers;

pub use access::{fetch_accessible_project, fetch_writable_project};
pub use types::{Project, ProjectDetail, ProjectMember, ProjectStatistics};
