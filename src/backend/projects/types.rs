/**
 * Project Types
 *
 * Database rows double as response bodies: the project and member queries
 * join in the creator and member names, so handlers serialize rows directly.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::{ProjectRole, ProjectStatus};

/// Project row with its creator's display name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub word_count: i64,
    pub created_by: i64,
    pub creator_name: String,
    pub base_folder_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row with the member's identity
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectMember {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub role: ProjectRole,
    pub user_email: String,
    pub user_full_name: String,
    pub created_at: DateTime<Utc>,
}

/// Project with its team and file count
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<ProjectMember>,
    pub file_count: i64,
}

/// Project counts by status
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectStatistics {
    pub total: i64,
    pub draft: i64,
    pub in_progress: i64,
    pub under_review: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial project update
///
/// Absent keys are left alone. For nullable columns an explicit `null`
/// clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "present")]
    pub base_folder_path: Option<Option<String>>,
    #[serde(default)]
    pub word_count: Option<i64>,
}

/// Marks a key that appeared in the payload, even when its value is `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemberAssignment {
    pub user_id: i64,
    pub role: ProjectRole,
}

/// Full replacement of a project's team
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamAssignment {
    pub members: Vec<MemberAssignment>,
}
