//! Chat Module
//!
//! Manuscript assistant endpoints over the configured `ModelProvider`.
//!
//! - **`context`** - optional file text attached to a prompt
//! - **`session`** - websocket turn loop (start, tokens, end)
//! - **`handlers`** - HTTP and websocket entry points

pub mod context;

pub mod session;

pub mod handlers;

pub use handlers::{chat, chat_websocket, model_info};
pub use session::{serve_connection, SessionContext};
