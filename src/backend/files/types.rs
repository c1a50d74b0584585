/**
 * File Types
 *
 * `FileRecord` is the metadata row joined with the uploader's name. The
 * bytes themselves live in storage under `storage_path`.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::SharedError;

/// Longest accepted name for an in-place created file, before sanitizing
pub const MAX_FILENAME_LEN: usize = 255;

/// Content type recorded for files created without an upload
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// Fallback when an upload carries no content type
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// File metadata row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FileRecord {
    pub id: i64,
    pub project_id: i64,
    /// Display name
    pub filename: String,
    /// Name as first received; never changes
    pub original_filename: String,
    pub storage_path: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub uploaded_by: i64,
    pub uploader_name: String,
    /// Optimistic-lock version, 0 on creation
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata for a row about to be inserted
#[derive(Debug, Clone)]
pub struct NewFile<'a> {
    pub project_id: i64,
    pub filename: &'a str,
    pub original_filename: &'a str,
    pub storage_path: &'a str,
    pub content_type: &'a str,
    pub size: i64,
    pub uploaded_by: i64,
}

/// File metadata as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    #[serde(flatten)]
    pub file: FileRecord,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileResponse>,
    pub total: usize,
}

/// Text view of a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContentResponse {
    pub filename: String,
    pub content: String,
    pub content_type: Option<String>,
}

/// Create a markdown file without uploading
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateFileRequest {
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

/// Name a created file is stored under
///
/// The raw name must be 1 to 255 characters. Path separators become `_`
/// and `.md` is appended when missing.
pub fn sanitize_created_filename(raw: &str) -> Result<String, SharedError> {
    let len = raw.chars().count();
    if len == 0 || len > MAX_FILENAME_LEN {
        return Err(SharedError::validation(
            "filename",
            format!("Filename must be between 1 and {} characters", MAX_FILENAME_LEN),
        ));
    }

    let mut name = raw.replace(['/', '\\'], "_");
    if !name.ends_with(".md") {
        name.push_str(".md");
    }
    Ok(name)
}

/// Final path component of a client-supplied upload name
pub fn upload_basename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}
