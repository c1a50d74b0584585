/**
 * Database Configuration
 *
 * Opens the SQLite pool named by `Settings::database_url` and applies the
 * embedded migrations. Unlike the optional services, the database is
 * required: a failure here stops startup.
 */

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::shared::Settings;

const MAX_CONNECTIONS: u32 = 8;

/// Connect to the database and run migrations
///
/// The database file is created if it does not exist and foreign keys are
/// enforced on every connection.
///
/// # Errors
///
/// Returns the underlying `sqlx` error if the URL is malformed, the file
/// cannot be opened, or a migration fails.
pub async fn load_database(settings: &Settings) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        sqlx::Error::from(e)
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_database_creates_file() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("workbench.db");
        let settings = Settings::builder()
            .database_url(format!("sqlite://{}", db_path.display()))
            .secret_key("s")
            .storage_path(dir.path())
            .build()
            .unwrap();

        let pool = load_database(&settings).await.unwrap();
        let tables: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'files'")
                .fetch_one(&pool)
                .await
                .unwrap();

        assert_eq!(tables, 1);
        assert!(db_path.exists());
    }
}
