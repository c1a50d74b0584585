//! Role and Status Enumerations
//!
//! String-backed enums shared by the API payloads and the database rows.
//! Each one round-trips through `as_str` / `from_str`, which is the form
//! stored in SQLite.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Global role held by every user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// Full access to every project and user
    Admin,
    /// Can edit files in projects they are a writer on
    Writer,
    /// Read-only access to projects they belong to
    Statistician,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::Admin, RoleName::Writer, RoleName::Statistician];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Writer => "writer",
            RoleName::Statistician => "statistician",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(RoleName::Admin),
            "writer" => Some(RoleName::Writer),
            "statistician" => Some(RoleName::Statistician),
            _ => None,
        }
    }

    /// Human-readable description stored alongside the seeded role
    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Admin => "Administrator with full access",
            RoleName::Writer => "Writer who can edit manuscripts",
            RoleName::Statistician => "Statistician who can review manuscripts",
        }
    }
}

impl TryFrom<String> for RoleName {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoleName::from_str(&value)
            .ok_or_else(|| SharedError::unknown("role", value))
    }
}

/// Lifecycle status of a manuscript project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    InProgress,
    UnderReview,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::InProgress,
        ProjectStatus::UnderReview,
        ProjectStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::UnderReview => "under_review",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ProjectStatus::Draft),
            "in_progress" => Some(ProjectStatus::InProgress),
            "under_review" => Some(ProjectStatus::UnderReview),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectStatus::from_str(&value)
            .ok_or_else(|| SharedError::unknown("project status", value))
    }
}

/// Role a user holds inside a single project, independent of their global role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Writer,
    Statistician,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Writer => "writer",
            ProjectRole::Statistician => "statistician",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "writer" => Some(ProjectRole::Writer),
            "statistician" => Some(ProjectRole::Statistician),
            _ => None,
        }
    }
}

impl TryFrom<String> for ProjectRole {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectRole::from_str(&value)
            .ok_or_else(|| SharedError::unknown("project role", value))
    }
}

/// `?skip=&limit=` query parameters for list endpoints
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
