use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::tasks::models::{
    BadgeVariant, StatusCount, Task, TaskStatus, TaskType, TaskWithClient,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub task_type: TaskType,
    pub status: Option<TaskStatus>,
    pub order_index: Option<i32>,
    pub required: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub instructions: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderTasksInput {
    pub task_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveTaskInput {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgencyTaskFilter {
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    pub id: String,
    pub client_id: String,
    pub template_task_id: Option<String>,
    pub title: String,
    pub description: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub badge_variant: BadgeVariant,
    pub order_index: i32,
    pub required: bool,
    pub due_date: Option<String>,
    pub estimated_duration: Option<i32>,
    pub instructions: Option<String>,
    pub metadata: serde_json::Value,
    pub wait_until: Option<String>,
    pub wait_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskData {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            client_id: task.client_id.to_string(),
            template_task_id: task.template_task_id,
            title: task.title,
            description: task.description,
            task_type: task.task_type,
            badge_variant: task.status.badge_variant(),
            status: task.status,
            order_index: task.order_index,
            required: task.required,
            due_date: task.due_date.map(|t| t.to_rfc3339()),
            estimated_duration: task.estimated_duration,
            instructions: task.instructions,
            metadata: task.metadata.0,
            wait_until: task.wait_until.map(|t| t.to_rfc3339()),
            wait_message: task.wait_message,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyTaskData {
    #[serde(flatten)]
    pub task: TaskData,
    pub client_name: String,
    pub company_name: Option<String>,
}

impl From<TaskWithClient> for AgencyTaskData {
    fn from(row: TaskWithClient) -> Self {
        Self {
            task: row.task.into(),
            client_name: row.client_name,
            company_name: row.company_name,
        }
    }
}

/// Task counts per status across an agency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub waiting: i64,
    pub blocked: i64,
    pub cancelled: i64,
}

impl TaskSummary {
    pub fn from_counts(counts: &[StatusCount]) -> Self {
        let mut summary = Self::default();
        for row in counts {
            summary.total += row.count;
            let slot = match row.status {
                TaskStatus::Pending => &mut summary.pending,
                TaskStatus::InProgress => &mut summary.in_progress,
                TaskStatus::Completed => &mut summary.completed,
                TaskStatus::Waiting => &mut summary.waiting,
                TaskStatus::Blocked => &mut summary.blocked,
                TaskStatus::Cancelled => &mut summary.cancelled,
            };
            *slot += row.count;
        }
        summary
    }
}
