use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::AgencyId;
use crate::domains::clients::ClientStatus;
use crate::domains::tasks::{TaskStatus, TaskType};

/// The client columns analytics needs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientFact {
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
}

/// The task columns analytics needs
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskFact {
    pub status: TaskStatus,
    pub task_type: TaskType,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientFact {
    pub async fn for_agency(agency_id: AgencyId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT status, created_at FROM clients WHERE agency_id = $1")
            .bind(agency_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}

impl TaskFact {
    pub async fn for_agency(agency_id: AgencyId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT t.status, t.task_type, t.due_date, t.created_at, t.updated_at
            FROM tasks t
            INNER JOIN clients c ON c.id = t.client_id
            WHERE c.agency_id = $1
            "#,
        )
        .bind(agency_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
