use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{AgencyId, ClientId, CommunicationId, Role, TaskId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Communication {
    pub id: CommunicationId,
    pub task_id: TaskId,
    pub sender_id: UserId,
    pub message: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Message joined with its sender's public profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunicationWithSender {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub communication: Communication,
    pub sender_name: String,
    pub sender_avatar_url: Option<String>,
    pub sender_role: Role,
}

/// A task thread with at least one message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub task_id: TaskId,
    pub task_title: String,
    pub client_id: ClientId,
    pub client_name: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub last_sender_id: UserId,
    pub message_count: i64,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateCommunication {
    pub task_id: TaskId,
    pub sender_id: UserId,
    pub message: String,
    #[builder(default)]
    pub file_url: Option<String>,
    #[builder(default)]
    pub file_name: Option<String>,
}

const WITH_SENDER: &str = r#"
    SELECT m.*, u.full_name AS sender_name, u.avatar_url AS sender_avatar_url, u.role AS sender_role
    FROM communications m
    INNER JOIN users u ON u.id = m.sender_id
"#;

impl Communication {
    pub async fn create(input: CreateCommunication, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO communications (id, task_id, sender_id, message, file_url, file_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(CommunicationId::new())
        .bind(input.task_id)
        .bind(input.sender_id)
        .bind(input.message)
        .bind(input.file_url)
        .bind(input.file_name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Oldest first, as a chat thread reads
    pub async fn list_for_task(
        task_id: TaskId,
        pool: &PgPool,
    ) -> Result<Vec<CommunicationWithSender>> {
        sqlx::query_as::<_, CommunicationWithSender>(&format!(
            "{} WHERE m.task_id = $1 ORDER BY m.created_at ASC",
            WITH_SENDER
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_with_sender(
        id: CommunicationId,
        pool: &PgPool,
    ) -> Result<CommunicationWithSender> {
        sqlx::query_as::<_, CommunicationWithSender>(&format!("{} WHERE m.id = $1", WITH_SENDER))
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}

impl Conversation {
    /// Threads on tasks of an agency (`portal_user = None`) or of one portal
    /// user's client record, most recent activity first
    pub async fn list(
        agency_id: AgencyId,
        portal_user: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT
                t.id AS task_id,
                t.title AS task_title,
                c.id AS client_id,
                c.full_name AS client_name,
                last.message AS last_message,
                last.created_at AS last_message_at,
                last.sender_id AS last_sender_id,
                counts.message_count
            FROM tasks t
            INNER JOIN clients c ON c.id = t.client_id
            INNER JOIN LATERAL (
                SELECT message, created_at, sender_id
                FROM communications
                WHERE task_id = t.id
                ORDER BY created_at DESC
                LIMIT 1
            ) last ON TRUE
            INNER JOIN LATERAL (
                SELECT COUNT(*) AS message_count FROM communications WHERE task_id = t.id
            ) counts ON TRUE
            WHERE c.agency_id = $1
              AND ($2::uuid IS NULL OR c.user_id = $2)
            ORDER BY last.created_at DESC
            "#,
        )
        .bind(agency_id)
        .bind(portal_user)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
