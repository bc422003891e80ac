use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    Presentation,
    Assignment,
    Quiz,
    LabReport,
    LabFinal,
    Documents,
    Blc,
    Groups,
    Other,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Presentation => "presentation",
            TaskCategory::Assignment => "assignment",
            TaskCategory::Quiz => "quiz",
            TaskCategory::LabReport => "lab-report",
            TaskCategory::LabFinal => "lab-final",
            TaskCategory::Documents => "documents",
            TaskCategory::Blc => "blc",
            TaskCategory::Groups => "groups",
            TaskCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Human label shown in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A task as created by the CRUD layer.
///
/// `description` is free text and the only place attachment links live,
/// written as `[label](url)`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    #[validate(length(min = 1, max = 500))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_admin_task: bool,
}
