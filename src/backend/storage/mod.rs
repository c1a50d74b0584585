//! Storage Module
//!
//! Blob storage behind the `StorageBackend` capability trait. File metadata
//! lives in the database; the bytes live here, addressed by an opaque
//! relative path of the form `projects/{project_id}/{token}_{filename}`.
//!
//! ```text
//! storage/
//! ├── mod.rs   - StorageBackend trait, StorageError, factory, key helpers
//! └── local.rs - Local filesystem backend
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::{Settings, StorageKind};

/// Local filesystem backend
pub mod local;

pub use local::LocalStorage;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    /// Path is empty, absolute, or escapes the storage root
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    #[error("storage configuration error: {0}")]
    Config(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Blob store addressed by relative path
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write `content` at `path`, creating parents and overwriting any existing blob.
    ///
    /// Returns the path the blob was stored under.
    async fn save(&self, content: &[u8], path: &str) -> StorageResult<String>;

    /// Read the full blob at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is stored there.
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Remove the blob at `path`. Returns `false` if it was already absent.
    async fn delete(&self, path: &str) -> StorageResult<bool>;

    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// All blob paths under `prefix`, recursively. Empty if the prefix does not resolve.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// URL a client can fetch the blob from
    fn url_for(&self, path: &str) -> String;
}

/// Construct the backend selected in settings
pub async fn create_storage(settings: &Settings) -> StorageResult<Arc<dyn StorageBackend>> {
    match settings.storage_backend {
        StorageKind::Local => {
            let storage = LocalStorage::open(&settings.storage_path).await?;
            tracing::info!("Local storage rooted at {}", settings.storage_path.display());
            Ok(Arc::new(storage))
        }
    }
}

/// Directory prefix holding every blob of a project
pub fn project_prefix(project_id: i64) -> String {
    format!("projects/{}", project_id)
}

/// Fresh, collision-free storage key for a file in a project
pub fn project_file_key(project_id: i64, filename: &str) -> String {
    format!(
        "{}/{}_{}",
        project_prefix(project_id),
        uuid::Uuid::new_v4().simple(),
        filename
    )
}
