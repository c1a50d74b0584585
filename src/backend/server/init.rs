/**
 * Server Initialization
 *
 * Builds the application from a validated `Settings`:
 * 1. Open the database and run migrations
 * 2. Seed roles and the admin account
 * 3. Construct the storage backend and model provider
 * 4. Assemble the router
 *
 * Unlike optional integrations, every step here is required; any failure is
 * returned as an `InitError` and the binary exits.
 */

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::backend::error::BackendError;
use crate::backend::llm::create_model;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::seed::{seed_admin, seed_roles};
use crate::backend::server::state::AppState;
use crate::backend::storage::{create_storage, StorageError};
use crate::shared::{ConfigError, Settings};

/// Startup failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("seeding failed: {0}")]
    Seed(#[from] BackendError),
}

/// Build the shared state: database, seed data, storage, model
pub async fn build_state(settings: Settings) -> Result<AppState, InitError> {
    settings.validate()?;

    let db_pool = load_database(&settings).await?;
    seed_roles(&db_pool).await?;
    seed_admin(&db_pool, &settings).await?;

    let storage = create_storage(&settings).await?;
    let model = create_model(&settings);

    Ok(AppState {
        db_pool,
        storage,
        model,
        settings: Arc::new(settings),
    })
}

/// Create and configure the Axum application
pub async fn create_app(settings: Settings) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing manuscript workbench server");

    let app_state = build_state(settings).await?;
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}
