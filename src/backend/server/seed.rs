//! Startup seeding of roles and the initial administrator.
//!
//! Both steps are idempotent and run on every boot.

use sqlx::SqlitePool;

use crate::backend::auth::roles::insert_role_if_missing;
use crate::backend::auth::users::{create_user, get_user_by_email};
use crate::backend::error::BackendResult;
use crate::shared::{RoleName, Settings};

/// Insert any of the three global roles that are missing
pub async fn seed_roles(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for role in RoleName::ALL {
        if insert_role_if_missing(pool, role).await? {
            tracing::info!("Seeded role '{}'", role.as_str());
        }
    }
    Ok(())
}

/// Create the configured admin account unless a user with that email exists
///
/// Returns `true` if the account was created.
pub async fn seed_admin(pool: &SqlitePool, settings: &Settings) -> BackendResult<bool> {
    if get_user_by_email(pool, &settings.admin_email).await?.is_some() {
        tracing::debug!("Admin account already present");
        return Ok(false);
    }

    let hashed = bcrypt::hash(&settings.admin_password, settings.password_hash_cost)?;
    let admin = create_user(
        pool,
        &settings.admin_email,
        &hashed,
        &settings.admin_full_name,
        RoleName::Admin,
    )
    .await?;

    tracing::info!("Seeded admin account {} (id {})", admin.email, admin.id);
    Ok(true)
}
