//! File context for chat prompts.

use sqlx::SqlitePool;

use crate::backend::auth::permissions::can_access_project;
use crate::backend::auth::users::User;
use crate::backend::files::FileStore;

/// Text of a project file to ground a prompt in
///
/// Empty unless both ids are given, the user can currently access the
/// project, and the file belongs to it and decodes as UTF-8. Failures are
/// logged and never reported to the caller.
pub async fn load_context(
    pool: &SqlitePool,
    store: &FileStore,
    user: &User,
    project_id: Option<i64>,
    file_id: Option<i64>,
) -> String {
    let (Some(project_id), Some(file_id)) = (project_id, file_id) else {
        return String::new();
    };

    match can_access_project(pool, user, project_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("User {} has no access to project {}, no chat context", user.id, project_id);
            return String::new();
        }
        Err(e) => {
            tracing::warn!("Access check for chat context failed: {}", e);
            return String::new();
        }
    }

    match store.read_text(project_id, file_id).await {
        Ok((file, content)) => format!("File: {}\n\n{}", file.filename, content),
        Err(e) => {
            tracing::debug!("No chat context from file {}: {}", file_id, e);
            String::new()
        }
    }
}
