/**
 * File Handlers
 *
 * Read endpoints need project access; write endpoints need write access
 * (admin, or a `writer` member). The check runs before the file is looked up.
 *
 * # Endpoints
 *
 * - GET    /api/projects/{id}/files
 * - POST   /api/projects/{id}/files                    - multipart `file`
 * - POST   /api/projects/{id}/files/create             - JSON `{filename, content}`
 * - GET    /api/projects/{id}/files/{file_id}
 * - GET    /api/projects/{id}/files/{file_id}/download
 * - GET    /api/projects/{id}/files/{file_id}/content
 * - PUT    /api/projects/{id}/files/{file_id}          - multipart `file` + `version`
 * - DELETE /api/projects/{id}/files/{file_id}
 * - GET    /api/storage/{*path}                        - blob by storage path
 */

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;

use crate::backend::auth::permissions::require_project_access;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::files::service::FileStore;
use crate::backend::files::types::{
    upload_basename, CreateFileRequest, FileContentResponse, FileListResponse, FileRecord,
    FileResponse, DEFAULT_CONTENT_TYPE,
};
use crate::backend::middleware::AuthUser;
use crate::backend::projects::access::{fetch_accessible_project, fetch_writable_project};
use crate::backend::server::state::AppState;

fn multipart_error(err: MultipartError) -> BackendError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        BackendError::too_large("Upload exceeds the maximum allowed size")
    } else {
        BackendError::validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// An uploaded `file` part
struct UploadedPart {
    filename: String,
    content_type: String,
    content: Bytes,
}

/// Fields of a multipart body this API understands
#[derive(Default)]
struct FileForm {
    file: Option<UploadedPart>,
    version: Option<String>,
}

async fn read_file_form(mut multipart: Multipart) -> BackendResult<FileForm> {
    let mut form = FileForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = upload_basename(field.file_name().unwrap_or_default()).to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedPart {
                    filename,
                    content_type,
                    content,
                });
            }
            Some("version") => {
                form.version = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::debug!("Ignoring multipart field {:?}", other);
            }
        }
    }

    Ok(form)
}

/// Quote-safe `Content-Disposition` for a download
fn attachment_header(filename: &str) -> BackendResult<HeaderValue> {
    let safe: String = filename
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .map_err(|e| BackendError::internal(format!("invalid content disposition: {}", e)))
}

fn download_response(file: &FileRecord, content: Vec<u8>) -> BackendResult<Response> {
    let content_type = file.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    Ok((
        [
            (CONTENT_TYPE, content_type),
            (CONTENT_DISPOSITION, attachment_header(&file.original_filename)?),
        ],
        content,
    )
        .into_response())
}

pub async fn list_files(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> BackendResult<Json<FileListResponse>> {
    let project = fetch_accessible_project(&app_state.db_pool, &user, project_id).await?;
    let store = FileStore::from_state(&app_state);

    let files: Vec<FileResponse> = store
        .list(project.id)
        .await?
        .into_iter()
        .map(|file| store.respond(file))
        .collect();
    let total = files.len();

    Ok(Json(FileListResponse { files, total }))
}

pub async fn upload_file(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    multipart: Multipart,
) -> BackendResult<(StatusCode, Json<FileResponse>)> {
    let project = fetch_writable_project(&app_state.db_pool, &user, project_id).await?;

    let form = read_file_form(multipart).await?;
    let part = form
        .file
        .ok_or_else(|| BackendError::validation("File is required"))?;

    let store = FileStore::from_state(&app_state);
    let file = store
        .upload(project.id, &part.filename, &part.content_type, &part.content, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(store.respond(file))))
}

pub async fn create_file(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(request): Json<CreateFileRequest>,
) -> BackendResult<(StatusCode, Json<FileResponse>)> {
    let project = fetch_writable_project(&app_state.db_pool, &user, project_id).await?;

    let store = FileStore::from_state(&app_state);
    let file = store
        .create(project.id, &request.filename, &request.content, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(store.respond(file))))
}

pub async fn get_file(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((project_id, file_id)): Path<(i64, i64)>,
) -> BackendResult<Json<FileResponse>> {
    let project = fetch_accessible_project(&app_state.db_pool, &user, project_id).await?;
    let store = FileStore::from_state(&app_state);
    let file = store.get(project.id, file_id).await?;
    Ok(Json(store.respond(file)))
}

pub async fn download_file(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((project_id, file_id)): Path<(i64, i64)>,
) -> BackendResult<Response> {
    let project = fetch_accessible_project(&app_state.db_pool, &user, project_id).await?;
    let (file, content) = FileStore::from_state(&app_state).read(project.id, file_id).await?;

    tracing::debug!("User {} downloading file {}", user.id, file.id);
    download_response(&file, content)
}

pub async fn get_file_content(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((project_id, file_id)): Path<(i64, i64)>,
) -> BackendResult<Json<FileContentResponse>> {
    let project = fetch_accessible_project(&app_state.db_pool, &user, project_id).await?;
    let (file, content) = FileStore::from_state(&app_state)
        .read_text(project.id, file_id)
        .await?;

    Ok(Json(FileContentResponse {
        filename: file.filename,
        content,
        content_type: file.content_type,
    }))
}

/// Replace a file's content
///
/// The form must carry the new content as `file` and a `version` strictly
/// greater than the stored one.
///
/// # Errors
///
/// * `400 Bad Request` - missing `file` or `version`, or non-integer version
/// * `409 Conflict` - stale version; body carries `current_version`
pub async fn update_file(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((project_id, file_id)): Path<(i64, i64)>,
    multipart: Multipart,
) -> BackendResult<Json<FileResponse>> {
    let project = fetch_writable_project(&app_state.db_pool, &user, project_id).await?;

    let form = read_file_form(multipart).await?;
    let version: i64 = form
        .version
        .ok_or_else(|| BackendError::validation("Version is required"))?
        .trim()
        .parse()
        .map_err(|_| BackendError::validation("Version must be an integer"))?;
    let part = form
        .file
        .ok_or_else(|| BackendError::validation("File is required"))?;

    let store = FileStore::from_state(&app_state);
    let file = store.update(project.id, file_id, version, &part.content).await?;

    tracing::info!("User {} saved file {} at version {}", user.id, file.id, file.version);
    Ok(Json(store.respond(file)))
}

pub async fn delete_file(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((project_id, file_id)): Path<(i64, i64)>,
) -> BackendResult<StatusCode> {
    let project = fetch_writable_project(&app_state.db_pool, &user, project_id).await?;
    FileStore::from_state(&app_state).delete(project.id, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serve a blob by its storage path, the target of `download_url`
pub async fn serve_storage(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(storage_path): Path<String>,
) -> BackendResult<Response> {
    let store = FileStore::from_state(&app_state);
    let file = store.get_by_storage_path(&storage_path).await?;
    require_project_access(&app_state.db_pool, &user, file.project_id).await?;

    let (file, content) = store.read(file.project_id, file.id).await?;
    download_response(&file, content)
}
