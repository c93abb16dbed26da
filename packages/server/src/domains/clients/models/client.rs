use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{AgencyId, ClientId, TemplateId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "client_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: ClientId,
    pub agency_id: AgencyId,
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub onboarding_template_id: Option<TemplateId>,
    pub assigned_user_id: Option<UserId>,
    /// Portal login, when the client has one
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateClient {
    pub agency_id: AgencyId,
    pub email: String,
    pub full_name: String,
    #[builder(default)]
    pub company_name: Option<String>,
    #[builder(default)]
    pub phone: Option<String>,
    #[builder(default)]
    pub status: ClientStatus,
    #[builder(default)]
    pub onboarding_template_id: Option<TemplateId>,
    #[builder(default)]
    pub assigned_user_id: Option<UserId>,
    #[builder(default)]
    pub user_id: Option<UserId>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClientParams {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ClientStatus>,
    pub onboarding_template_id: Option<TemplateId>,
    pub assigned_user_id: Option<UserId>,
}

impl Client {
    pub async fn create(input: CreateClient, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO clients (
                id, agency_id, email, full_name, company_name, phone, status,
                onboarding_template_id, assigned_user_id, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(ClientId::new())
        .bind(input.agency_id)
        .bind(input.email)
        .bind(input.full_name)
        .bind(input.company_name)
        .bind(input.phone)
        .bind(input.status)
        .bind(input.onboarding_template_id)
        .bind(input.assigned_user_id)
        .bind(input.user_id)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Client by id, only if it belongs to the agency
    pub async fn find_in_agency(
        id: ClientId,
        agency_id: AgencyId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients WHERE id = $1 AND agency_id = $2")
            .bind(id)
            .bind(agency_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: ClientId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// The client record a portal user signs in for
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn email_taken(agency_id: AgencyId, email: &str, pool: &PgPool) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE agency_id = $1 AND LOWER(email) = LOWER($2))",
        )
        .bind(agency_id)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    pub async fn list_for_agency(agency_id: AgencyId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM clients WHERE agency_id = $1 ORDER BY created_at DESC",
        )
        .bind(agency_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: ClientId, params: UpdateClientParams, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE clients SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                company_name = COALESCE($4, company_name),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status),
                onboarding_template_id = COALESCE($7, onboarding_template_id),
                assigned_user_id = COALESCE($8, assigned_user_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.email)
        .bind(params.full_name)
        .bind(params.company_name)
        .bind(params.phone)
        .bind(params.status)
        .bind(params.onboarding_template_id)
        .bind(params.assigned_user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete within an agency; returns whether a row was removed
    pub async fn delete(id: ClientId, agency_id: AgencyId, conn: &mut PgConnection) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND agency_id = $2")
            .bind(id)
            .bind(agency_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
