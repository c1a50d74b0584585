/**
 * File Versioning Engine
 *
 * `FileStore` keeps file metadata (database) and content (storage backend)
 * in step. Callers have already passed the project access check; every
 * operation here is additionally scoped to the project id so a file from
 * another project is indistinguishable from a missing one.
 *
 * # Update protocol
 *
 * Inside one transaction:
 * 1. `UPDATE ... WHERE version < submitted` bumps the row
 * 2. zero rows → read the stored version: conflict if present, not found otherwise
 * 3. overwrite the blob at the row's storage path
 * 4. commit
 *
 * A failure before commit rolls the row back. If the commit itself fails
 * after the blob was written, the blob is ahead of the metadata until the
 * next successful update.
 */

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::files::db;
use crate::backend::files::types::{
    sanitize_created_filename, FileRecord, FileResponse, NewFile, MARKDOWN_CONTENT_TYPE,
};
use crate::backend::server::state::AppState;
use crate::backend::storage::{project_file_key, StorageBackend};

fn file_not_found() -> BackendError {
    BackendError::not_found("File not found")
}

/// Metadata plus blob operations for project files
#[derive(Clone)]
pub struct FileStore {
    pool: SqlitePool,
    storage: Arc<dyn StorageBackend>,
}

impl FileStore {
    pub fn new(pool: SqlitePool, storage: Arc<dyn StorageBackend>) -> Self {
        Self { pool, storage }
    }

    pub fn from_state(app_state: &AppState) -> Self {
        Self::new(app_state.db_pool.clone(), app_state.storage.clone())
    }

    /// Attach the client-facing download URL
    pub fn respond(&self, file: FileRecord) -> FileResponse {
        let download_url = self.storage.url_for(&file.storage_path);
        FileResponse { file, download_url }
    }

    pub async fn list(&self, project_id: i64) -> BackendResult<Vec<FileRecord>> {
        Ok(db::list_project_files(&self.pool, project_id).await?)
    }

    /// Metadata of a file in the project
    pub async fn get(&self, project_id: i64, file_id: i64) -> BackendResult<FileRecord> {
        db::get_project_file(&self.pool, project_id, file_id)
            .await?
            .ok_or_else(file_not_found)
    }

    /// Metadata looked up by storage path, regardless of project
    pub async fn get_by_storage_path(&self, storage_path: &str) -> BackendResult<FileRecord> {
        db::get_file_by_storage_path(&self.pool, storage_path)
            .await?
            .ok_or_else(file_not_found)
    }

    /// Store new content and record it at version 0
    ///
    /// If the row cannot be inserted the blob is removed again.
    async fn store_new(
        &self,
        project_id: i64,
        filename: &str,
        original_filename: &str,
        content_type: &str,
        content: &[u8],
        uploaded_by: i64,
    ) -> BackendResult<FileRecord> {
        let storage_path = project_file_key(project_id, original_filename);
        self.storage.save(content, &storage_path).await?;

        let new = NewFile {
            project_id,
            filename,
            original_filename,
            storage_path: &storage_path,
            content_type,
            size: content.len() as i64,
            uploaded_by,
        };
        match db::insert_file(&self.pool, &new).await {
            Ok(file) => Ok(file),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&storage_path).await {
                    tracing::warn!("Failed to remove orphaned blob {}: {}", storage_path, cleanup);
                }
                Err(e.into())
            }
        }
    }

    /// Record an uploaded file
    ///
    /// `filename` must already be reduced to a bare, non-empty name.
    pub async fn upload(
        &self,
        project_id: i64,
        filename: &str,
        content_type: &str,
        content: &[u8],
        uploaded_by: i64,
    ) -> BackendResult<FileRecord> {
        if filename.is_empty() {
            return Err(BackendError::validation("Filename is required"));
        }
        if content.is_empty() {
            return Err(BackendError::validation("Uploaded file is empty"));
        }

        let file = self
            .store_new(project_id, filename, filename, content_type, content, uploaded_by)
            .await?;
        tracing::info!(
            "User {} uploaded file {} '{}' ({} bytes) to project {}",
            uploaded_by,
            file.id,
            file.filename,
            file.size,
            project_id
        );
        Ok(file)
    }

    /// Create a markdown file from text
    pub async fn create(
        &self,
        project_id: i64,
        raw_filename: &str,
        content: &str,
        created_by: i64,
    ) -> BackendResult<FileRecord> {
        let filename = sanitize_created_filename(raw_filename)?;

        let file = self
            .store_new(
                project_id,
                &filename,
                &filename,
                MARKDOWN_CONTENT_TYPE,
                content.as_bytes(),
                created_by,
            )
            .await?;
        tracing::info!(
            "User {} created file {} '{}' in project {}",
            created_by,
            file.id,
            file.filename,
            project_id
        );
        Ok(file)
    }

    /// Metadata and raw bytes
    pub async fn read(&self, project_id: i64, file_id: i64) -> BackendResult<(FileRecord, Vec<u8>)> {
        let file = self.get(project_id, file_id).await?;
        let content = self.storage.read(&file.storage_path).await?;
        Ok((file, content))
    }

    /// Metadata and content decoded as UTF-8
    ///
    /// # Errors
    ///
    /// * `Decoding` - the bytes are not valid UTF-8
    pub async fn read_text(&self, project_id: i64, file_id: i64) -> BackendResult<(FileRecord, String)> {
        let (file, content) = self.read(project_id, file_id).await?;
        let text = String::from_utf8(content).map_err(|_| {
            tracing::warn!("File {} is not valid UTF-8", file.id);
            BackendError::decoding("File is not a text file")
        })?;
        Ok((file, text))
    }

    /// Replace content under the optimistic lock
    ///
    /// # Errors
    ///
    /// * `VersionConflict` - `version` is not greater than the stored version
    /// * `NotFound` - no such file in the project
    pub async fn update(
        &self,
        project_id: i64,
        file_id: i64,
        version: i64,
        content: &[u8],
    ) -> BackendResult<FileRecord> {
        let mut tx = self.pool.begin().await?;

        let storage_path =
            match db::advance_version(&mut *tx, project_id, file_id, version, content.len() as i64).await? {
                Some(path) => path,
                None => {
                    let current = db::current_version(&mut *tx, project_id, file_id).await?;
                    tx.rollback().await?;
                    return Err(match current {
                        Some(current) => {
                            tracing::warn!(
                                "Version conflict on file {}: server {}, submitted {}",
                                file_id,
                                current,
                                version
                            );
                            BackendError::conflict(current, version)
                        }
                        None => file_not_found(),
                    });
                }
            };

        self.storage.save(content, &storage_path).await?;
        tx.commit().await?;

        tracing::info!("File {} updated to version {} ({} bytes)", file_id, version, content.len());
        self.get(project_id, file_id).await
    }

    /// Remove blob then metadata
    ///
    /// A blob that is already gone is not an error.
    pub async fn delete(&self, project_id: i64, file_id: i64) -> BackendResult<()> {
        let file = self.get(project_id, file_id).await?;

        if !self.storage.delete(&file.storage_path).await? {
            tracing::warn!("Blob {} of file {} was already absent", file.storage_path, file.id);
        }
        if !db::delete_file_row(&self.pool, file.id).await? {
            return Err(file_not_found());
        }

        tracing::info!("File {} '{}' deleted from project {}", file.id, file.filename, project_id);
        Ok(())
    }
}
