use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::AgencyId;

/// Billing country used when sign-up leaves it blank
pub const DEFAULT_BILLING_COUNTRY: &str = "Canada";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub billing_address: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateAgency {
    pub name: String,
    pub slug: String,
    #[builder(default)]
    pub website: Option<String>,
    #[builder(default)]
    pub phone: Option<String>,
    #[builder(default)]
    pub billing_address: Option<String>,
    #[builder(default)]
    pub billing_city: Option<String>,
    #[builder(default)]
    pub billing_zip: Option<String>,
    #[builder(default = Some(DEFAULT_BILLING_COUNTRY.to_string()))]
    pub billing_country: Option<String>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgencyParams {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub billing_address: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_country: Option<String>,
}

impl Agency {
    /// Insert inside the caller's transaction (sign-up creates agency and owner together)
    pub async fn create(input: CreateAgency, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO agencies (id, name, slug, website, phone, billing_address, billing_city, billing_zip, billing_country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(AgencyId::new())
        .bind(input.name)
        .bind(input.slug)
        .bind(input.website)
        .bind(input.phone)
        .bind(input.billing_address)
        .bind(input.billing_city)
        .bind(input.billing_zip)
        .bind(input.billing_country)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: AgencyId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM agencies WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn slug_taken(slug: &str, pool: &PgPool) -> Result<bool> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM agencies WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(taken)
    }

    pub async fn update(id: AgencyId, params: UpdateAgencyParams, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE agencies SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                logo_url = COALESCE($4, logo_url),
                website = COALESCE($5, website),
                phone = COALESCE($6, phone),
                primary_color = COALESCE($7, primary_color),
                secondary_color = COALESCE($8, secondary_color),
                billing_address = COALESCE($9, billing_address),
                billing_city = COALESCE($10, billing_city),
                billing_zip = COALESCE($11, billing_zip),
                billing_country = COALESCE($12, billing_country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.name)
        .bind(params.slug)
        .bind(params.logo_url)
        .bind(params.website)
        .bind(params.phone)
        .bind(params.primary_color)
        .bind(params.secondary_color)
        .bind(params.billing_address)
        .bind(params.billing_city)
        .bind(params.billing_zip)
        .bind(params.billing_country)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
