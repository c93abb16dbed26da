use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{ClientId, SubmissionId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "submission_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    Text,
    File,
    Link,
    AccountCreated,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskSubmission {
    pub id: SubmissionId,
    pub task_id: TaskId,
    pub client_id: ClientId,
    pub submission_type: SubmissionType,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub metadata: Json<serde_json::Value>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateSubmission {
    pub task_id: TaskId,
    pub client_id: ClientId,
    pub submission_type: SubmissionType,
    #[builder(default)]
    pub content: Option<String>,
    #[builder(default)]
    pub file_url: Option<String>,
    #[builder(default)]
    pub file_name: Option<String>,
    #[builder(default)]
    pub file_size: Option<i64>,
    #[builder(default = serde_json::json!({}))]
    pub metadata: serde_json::Value,
}

impl TaskSubmission {
    pub async fn create(input: CreateSubmission, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO task_submissions (
                id, task_id, client_id, submission_type, content,
                file_url, file_name, file_size, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(SubmissionId::new())
        .bind(input.task_id)
        .bind(input.client_id)
        .bind(input.submission_type)
        .bind(input.content)
        .bind(input.file_url)
        .bind(input.file_name)
        .bind(input.file_size)
        .bind(Json(input.metadata))
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn list_for_task(task_id: TaskId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM task_submissions WHERE task_id = $1 ORDER BY submitted_at DESC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
