/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. Every
 * field is cheap to clone: the pool is reference counted and the services
 * sit behind `Arc`.
 *
 * The `FromRef` implementations let handlers extract only the part they
 * need, e.g. `State(pool): State<SqlitePool>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::llm::ModelProvider;
use crate::backend::storage::StorageBackend;
use crate::shared::Settings;

/// Shared application state
///
/// # Fields
///
/// * `db_pool` - SQLite connection pool
/// * `storage` - blob storage for file content
/// * `model` - language model used by chat
/// * `settings` - validated configuration
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub storage: Arc<dyn StorageBackend>,
    pub model: Arc<dyn ModelProvider>,
    pub settings: Arc<Settings>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<dyn StorageBackend> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ModelProvider> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.model.clone()
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.settings.clone()
    }
}
