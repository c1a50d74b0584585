//! Unit-test fixtures: in-memory database, temp storage, and row builders.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::backend::auth::roles::insert_role_if_missing;
use crate::backend::auth::users::{create_user, User};
use crate::backend::llm::DemoModel;
use crate::backend::projects::db::create_project;
use crate::backend::server::state::AppState;
use crate::backend::storage::LocalStorage;
use crate::shared::{RoleName, Settings};

/// Password every fixture user is created with
pub const TEST_PASSWORD: &str = "password123";

/// Fresh in-memory database with migrations applied and no rows
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // One connection that never recycles, or the in-memory database vanishes.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

/// In-memory database with the three roles seeded
pub async fn seeded_pool() -> SqlitePool {
    let pool = test_pool().await;
    for role in RoleName::ALL {
        insert_role_if_missing(&pool, role).await.unwrap();
    }
    pool
}

pub fn test_settings(storage: &TempDir) -> Settings {
    Settings::builder()
        .secret_key("unit-test-secret")
        .storage_path(storage.path())
        .password_hash_cost(4)
        .demo_token_delay_ms(0)
        .chat_turn_timeout_secs(5)
        .build()
        .unwrap()
}

/// Application state over a seeded in-memory database and a temp storage root
pub async fn test_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let settings = test_settings(&dir);
    let storage = LocalStorage::open(dir.path()).await.unwrap();
    let state = AppState {
        db_pool: seeded_pool().await,
        storage: Arc::new(storage),
        model: Arc::new(DemoModel::new(Duration::ZERO)),
        settings: Arc::new(settings),
    };
    (dir, state)
}

/// Active user with [`TEST_PASSWORD`], named after the email's local part
pub async fn insert_user(pool: &SqlitePool, email: &str, role: RoleName) -> User {
    let hash = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
    let name = email.split('@').next().unwrap_or(email);
    create_user(pool, email, &hash, name, role).await.unwrap()
}

pub async fn insert_project(pool: &SqlitePool, name: &str, created_by: i64) -> i64 {
    create_project(pool, name, None, created_by).await.unwrap().id
}
