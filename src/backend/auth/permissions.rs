/**
 * Permission Evaluator
 *
 * Decides what a user may do. Global decisions (`is_admin`,
 * `has_permission`) look only at the user's role. Project decisions consult
 * the `project_members` table on every call; nothing is cached across
 * requests, so membership changes apply immediately.
 *
 * # Rules
 *
 * - access project ⇔ admin ∨ member (any project role)
 * - write files    ⇔ admin ∨ member with project role `writer`
 *
 * The `require_*` helpers turn a negative decision into the matching
 * `BackendError` for handlers.
 */

use sqlx::SqlitePool;

use crate::backend::auth::users::User;
use crate::backend::error::{BackendError, BackendResult};
use crate::shared::{ProjectRole, RoleName};

/// Global role is `admin`
pub fn is_admin(user: &User) -> bool {
    user.role_name == RoleName::Admin
}

/// The user's role grants `permission`
pub fn has_permission(user: &User, permission: &str) -> bool {
    user.permissions.0.iter().any(|granted| granted == permission)
}

/// Pure access rule
pub fn access_decision(is_admin: bool, membership: Option<ProjectRole>) -> bool {
    is_admin || membership.is_some()
}

/// Pure write rule
pub fn write_decision(is_admin: bool, membership: Option<ProjectRole>) -> bool {
    is_admin || membership == Some(ProjectRole::Writer)
}

/// Project role of a user in a project, if they are a member
pub async fn membership_role(
    pool: &SqlitePool,
    user_id: i64,
    project_id: i64,
) -> Result<Option<ProjectRole>, sqlx::Error> {
    let role: Option<String> = sqlx::query_scalar(
        "SELECT role FROM project_members WHERE project_id = ? AND user_id = ?",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(role.as_deref().and_then(ProjectRole::from_str))
}

/// Admin, or any membership in the project
pub async fn can_access_project(
    pool: &SqlitePool,
    user: &User,
    project_id: i64,
) -> Result<bool, sqlx::Error> {
    if is_admin(user) {
        return Ok(true);
    }
    let membership = membership_role(pool, user.id, project_id).await?;
    Ok(access_decision(false, membership))
}

/// Admin, or a `writer` membership in the project
pub async fn can_write_files(
    pool: &SqlitePool,
    user: &User,
    project_id: i64,
) -> Result<bool, sqlx::Error> {
    if is_admin(user) {
        return Ok(true);
    }
    let membership = membership_role(pool, user.id, project_id).await?;
    Ok(write_decision(false, membership))
}

pub fn require_admin(user: &User) -> BackendResult<()> {
    if is_admin(user) {
        Ok(())
    } else {
        Err(BackendError::authorization("Admin access required"))
    }
}

pub fn require_permission(user: &User, permission: &str) -> BackendResult<()> {
    if has_permission(user, permission) {
        Ok(())
    } else {
        Err(BackendError::authorization(format!(
            "Permission '{}' required",
            permission
        )))
    }
}

pub async fn require_project_access(pool: &SqlitePool, user: &User, project_id: i64) -> BackendResult<()> {
    if can_access_project(pool, user, project_id).await? {
        Ok(())
    } else {
        Err(BackendError::authorization("Access denied for this project"))
    }
}

pub async fn require_write_access(pool: &SqlitePool, user: &User, project_id: i64) -> BackendResult<()> {
    if can_write_files(pool, user, project_id).await? {
        Ok(())
    } else {
        Err(BackendError::authorization("Write access denied for this project"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{insert_project, insert_user, seeded_pool};
    use crate::backend::projects::members::upsert_member;
    use proptest::prelude::*;

    fn arb_membership() -> impl Strategy<Value = Option<ProjectRole>> {
        prop_oneof![
            Just(None),
            Just(Some(ProjectRole::Writer)),
            Just(Some(ProjectRole::Statistician)),
        ]
    }

    proptest! {
        #[test]
        fn write_implies_access(admin in any::<bool>(), membership in arb_membership()) {
            if write_decision(admin, membership) {
                prop_assert!(access_decision(admin, membership));
            }
        }

        #[test]
        fn admin_always_allowed(membership in arb_membership()) {
            prop_assert!(access_decision(true, membership));
            prop_assert!(write_decision(true, membership));
        }

        #[test]
        fn non_admin_access_is_membership(membership in arb_membership()) {
            prop_assert_eq!(access_decision(false, membership), membership.is_some());
            prop_assert_eq!(write_decision(false, membership), membership == Some(ProjectRole::Writer));
        }
    }

    #[tokio::test]
    async fn test_project_rules_against_database() {
        let pool = seeded_pool().await;
        let admin = insert_user(&pool, "admin@x.io", RoleName::Admin).await;
        let writer = insert_user(&pool, "writer@x.io", RoleName::Writer).await;
        let stat = insert_user(&pool, "stat@x.io", RoleName::Statistician).await;
        let outsider = insert_user(&pool, "out@x.io", RoleName::Writer).await;
        let project = insert_project(&pool, "Paper", admin.id).await;

        upsert_member(&pool, project, writer.id, ProjectRole::Writer).await.unwrap();
        upsert_member(&pool, project, stat.id, ProjectRole::Statistician).await.unwrap();

        assert!(can_access_project(&pool, &admin, project).await.unwrap());
        assert!(can_write_files(&pool, &admin, project).await.unwrap());
        assert!(can_access_project(&pool, &writer, project).await.unwrap());
        assert!(can_write_files(&pool, &writer, project).await.unwrap());
        assert!(can_access_project(&pool, &stat, project).await.unwrap());
        assert!(!can_write_files(&pool, &stat, project).await.unwrap());
        assert!(!can_access_project(&pool, &outsider, project).await.unwrap());
        assert!(!can_write_files(&pool, &outsider, project).await.unwrap());
    }

    #[tokio::test]
    async fn test_global_writer_with_statistician_membership_cannot_write() {
        let pool = seeded_pool().await;
        let admin = insert_user(&pool, "admin@x.io", RoleName::Admin).await;
        let writer = insert_user(&pool, "writer@x.io", RoleName::Writer).await;
        let project = insert_project(&pool, "Paper", admin.id).await;
        upsert_member(&pool, project, writer.id, ProjectRole::Statistician).await.unwrap();

        assert!(!can_write_files(&pool, &writer, project).await.unwrap());
        let err = require_write_access(&pool, &writer, project).await.unwrap_err();
        assert!(matches!(err, BackendError::Authorization { .. }));
    }

    #[tokio::test]
    async fn test_has_permission_reads_role_set() {
        let pool = seeded_pool().await;
        let stat = insert_user(&pool, "stat@x.io", RoleName::Statistician).await;
        assert!(has_permission(&stat, "files:read"));
        assert!(!has_permission(&stat, "files:update"));
        assert!(!is_admin(&stat));
        assert!(require_admin(&stat).is_err());
    }
}
