use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{AgencyId, TemplateId};
use crate::domains::tasks::models::TaskType;

/// Blueprint for one task, stored inside the template's JSON array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateTask {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub task_type: TaskType,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Template {
    pub id: TemplateId,
    pub agency_id: AgencyId,
    pub name: String,
    pub description: Option<String>,
    pub tasks: Json<Vec<TemplateTask>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateTemplate {
    pub agency_id: AgencyId,
    pub name: String,
    #[builder(default)]
    pub description: Option<String>,
    #[builder(default)]
    pub tasks: Vec<TemplateTask>,
    #[builder(default = true)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tasks: Option<Vec<TemplateTask>>,
    pub is_active: Option<bool>,
}

impl Template {
    pub async fn create(input: CreateTemplate, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO templates (id, agency_id, name, description, tasks, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(TemplateId::new())
        .bind(input.agency_id)
        .bind(input.name)
        .bind(input.description)
        .bind(Json(input.tasks))
        .bind(input.is_active)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Template by id, only if it belongs to the agency
    pub async fn find_in_agency(
        id: TemplateId,
        agency_id: AgencyId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM templates WHERE id = $1 AND agency_id = $2")
            .bind(id)
            .bind(agency_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list_for_agency(agency_id: AgencyId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM templates WHERE agency_id = $1 ORDER BY created_at DESC",
        )
        .bind(agency_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: TemplateId, params: UpdateTemplateParams, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE templates SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                tasks = COALESCE($4, tasks),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.name)
        .bind(params.description)
        .bind(params.tasks.map(Json))
        .bind(params.is_active)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: TemplateId, agency_id: AgencyId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND agency_id = $2")
            .bind(id)
            .bind(agency_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
