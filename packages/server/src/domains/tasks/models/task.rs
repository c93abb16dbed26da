use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{AgencyId, ClientId, TaskId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    AccountCreation,
    ManualTask,
    DocumentUpload,
    ReviewApproval,
    FormCompletion,
    VideoRecording,
    MeetingScheduling,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::AccountCreation => "account_creation",
            TaskType::ManualTask => "manual_task",
            TaskType::DocumentUpload => "document_upload",
            TaskType::ReviewApproval => "review_approval",
            TaskType::FormCompletion => "form_completion",
            TaskType::VideoRecording => "video_recording",
            TaskType::MeetingScheduling => "meeting_scheduling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Waiting,
    Blocked,
    Cancelled,
}

/// Colour family a status is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Success,
    Info,
    Warning,
    Danger,
    Default,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Waiting,
        TaskStatus::Blocked,
        TaskStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Waiting => "waiting",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn badge_variant(&self) -> BadgeVariant {
        match self {
            TaskStatus::Completed => BadgeVariant::Success,
            TaskStatus::InProgress => BadgeVariant::Info,
            TaskStatus::Waiting => BadgeVariant::Warning,
            TaskStatus::Blocked => BadgeVariant::Danger,
            TaskStatus::Pending | TaskStatus::Cancelled => BadgeVariant::Default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: TaskId,
    pub client_id: ClientId,
    pub template_task_id: Option<String>,
    pub title: String,
    pub description: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub order_index: i32,
    pub required: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub instructions: Option<String>,
    pub metadata: Json<serde_json::Value>,
    pub wait_until: Option<DateTime<Utc>>,
    pub wait_message: Option<String>,
    pub overdue_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task joined with the client it belongs to (agency-wide task lists)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithClient {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub client_name: String,
    pub company_name: Option<String>,
}

/// A task past its due date that nobody has been told about yet
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OverdueTask {
    pub id: TaskId,
    pub title: String,
    pub client_name: String,
    pub assigned_user_id: UserId,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateTask {
    pub client_id: ClientId,
    pub title: String,
    pub task_type: TaskType,
    pub order_index: i32,
    #[builder(default)]
    pub description: String,
    #[builder(default = TaskStatus::Pending)]
    pub status: TaskStatus,
    #[builder(default = true)]
    pub required: bool,
    #[builder(default)]
    pub template_task_id: Option<String>,
    #[builder(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[builder(default)]
    pub estimated_duration: Option<i32>,
    #[builder(default)]
    pub instructions: Option<String>,
    #[builder(default = serde_json::json!({}))]
    pub metadata: serde_json::Value,
}

/// Partial update; `None` leaves the column unchanged.
///
/// Moving a task out of `waiting` clears its wait fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub required: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub instructions: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub wait_until: Option<DateTime<Utc>>,
    pub wait_message: Option<String>,
}

impl Task {
    pub async fn create(input: CreateTask, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tasks (
                id, client_id, template_task_id, title, description, task_type, status,
                order_index, required, due_date, estimated_duration, instructions, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(TaskId::new())
        .bind(input.client_id)
        .bind(input.template_task_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.task_type)
        .bind(input.status)
        .bind(input.order_index)
        .bind(input.required)
        .bind(input.due_date)
        .bind(input.estimated_duration)
        .bind(input.instructions)
        .bind(Json(input.metadata))
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// One past the client's highest order index (1 for an empty list)
    pub async fn next_order_index(client_id: ClientId, conn: &mut PgConnection) -> Result<i32> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(order_index), 0) + 1 FROM tasks WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_one(conn)
        .await?;
        Ok(next)
    }

    pub async fn find_optional(id: TaskId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list_for_client(client_id: ClientId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM tasks WHERE client_id = $1 ORDER BY order_index ASC, created_at ASC",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn ids_for_client(client_id: ClientId, conn: &mut PgConnection) -> Result<Vec<TaskId>> {
        sqlx::query_scalar(
            "SELECT id FROM tasks WHERE client_id = $1 ORDER BY order_index ASC, created_at ASC",
        )
        .bind(client_id)
        .fetch_all(conn)
        .await
        .map_err(Into::into)
    }

    /// Tasks of every client of an agency, newest first.
    ///
    /// `search` matches title or description case-insensitively.
    pub async fn list_for_agency(
        agency_id: AgencyId,
        status: Option<TaskStatus>,
        search: Option<&str>,
        pool: &PgPool,
    ) -> Result<Vec<TaskWithClient>> {
        let pattern = search.map(|s| format!("%{}%", escape_like(s)));
        sqlx::query_as::<_, TaskWithClient>(
            r#"
            SELECT t.*, c.full_name AS client_name, c.company_name
            FROM tasks t
            INNER JOIN clients c ON c.id = t.client_id
            WHERE c.agency_id = $1
              AND ($2::task_status IS NULL OR t.status = $2)
              AND ($3::text IS NULL OR t.title ILIKE $3 OR t.description ILIKE $3)
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(agency_id)
        .bind(status)
        .bind(pattern)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_status(agency_id: AgencyId, pool: &PgPool) -> Result<Vec<StatusCount>> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT t.status, COUNT(*) AS count
            FROM tasks t
            INNER JOIN clients c ON c.id = t.client_id
            WHERE c.agency_id = $1
            GROUP BY t.status
            "#,
        )
        .bind(agency_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: TaskId, params: UpdateTaskParams, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                task_type = COALESCE($4, task_type),
                status = COALESCE($5, status),
                required = COALESCE($6, required),
                due_date = COALESCE($7, due_date),
                estimated_duration = COALESCE($8, estimated_duration),
                instructions = COALESCE($9, instructions),
                metadata = COALESCE($10, metadata),
                wait_until = CASE
                    WHEN $5 IS NOT NULL AND $5 <> 'waiting'::task_status THEN NULL
                    ELSE COALESCE($11, wait_until)
                END,
                wait_message = CASE
                    WHEN $5 IS NOT NULL AND $5 <> 'waiting'::task_status THEN NULL
                    ELSE COALESCE($12, wait_message)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.title)
        .bind(params.description)
        .bind(params.task_type)
        .bind(params.status)
        .bind(params.required)
        .bind(params.due_date)
        .bind(params.estimated_duration)
        .bind(params.instructions)
        .bind(params.metadata.map(Json))
        .bind(params.wait_until)
        .bind(params.wait_message)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_status(id: TaskId, status: TaskStatus, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE tasks SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Complete a task and merge `patch` into its metadata, in one statement
    pub async fn complete_with_metadata(
        id: TaskId,
        patch: serde_json::Value,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE tasks
            SET status = 'completed', metadata = metadata || $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(patch))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Persist `(id, order_index)` pairs for one client in a single statement
    pub async fn apply_order(
        client_id: ClientId,
        order: &[(TaskId, i32)],
        conn: &mut PgConnection,
    ) -> Result<u64> {
        let ids: Vec<TaskId> = order.iter().map(|(id, _)| *id).collect();
        let indices: Vec<i32> = order.iter().map(|(_, idx)| *idx).collect();
        let result = sqlx::query(
            r#"
            UPDATE tasks t
            SET order_index = v.order_index, updated_at = NOW()
            FROM UNNEST($2::uuid[], $3::int4[]) AS v(id, order_index)
            WHERE t.id = v.id AND t.client_id = $1
            "#,
        )
        .bind(client_id)
        .bind(ids)
        .bind(indices)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(id: TaskId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Overdue tasks whose client has an assigned user and that were not yet reported
    pub async fn find_overdue_unnotified(pool: &PgPool) -> Result<Vec<OverdueTask>> {
        sqlx::query_as::<_, OverdueTask>(
            r#"
            SELECT t.id, t.title, c.full_name AS client_name, c.assigned_user_id
            FROM tasks t
            INNER JOIN clients c ON c.id = t.client_id
            WHERE t.due_date < NOW()
              AND t.status NOT IN ('completed', 'cancelled')
              AND t.overdue_notified_at IS NULL
              AND c.assigned_user_id IS NOT NULL
            ORDER BY t.due_date ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_overdue_notified(id: TaskId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE tasks SET overdue_notified_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

fn escape_like(input: &str) -> String {
    input
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_variant_per_status() {
        assert_eq!(TaskStatus::Completed.badge_variant(), BadgeVariant::Success);
        assert_eq!(TaskStatus::InProgress.badge_variant(), BadgeVariant::Info);
        assert_eq!(TaskStatus::Waiting.badge_variant(), BadgeVariant::Warning);
        assert_eq!(TaskStatus::Blocked.badge_variant(), BadgeVariant::Danger);
        assert_eq!(TaskStatus::Pending.badge_variant(), BadgeVariant::Default);
        assert_eq!(TaskStatus::Cancelled.badge_variant(), BadgeVariant::Default);
    }

    #[test]
    fn test_status_serializes_like_database() {
        for status in TaskStatus::ALL {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::json!(status.as_str())
            );
        }
    }

    #[test]
    fn test_task_type_parses_snake_case() {
        let parsed: TaskType = serde_json::from_str("\"meeting_scheduling\"").unwrap();
        assert_eq!(parsed, TaskType::MeetingScheduling);
        assert_eq!(parsed.as_str(), "meeting_scheduling");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like(" 50%_off "), "50\\%\\_off");
    }
}
