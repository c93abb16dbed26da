use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{AgencyId, Role, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub agency_id: AgencyId,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub agency_id: AgencyId,
    #[builder(default)]
    pub phone: Option<String>,
    /// bcrypt hash; users invited by magic link have none
    #[builder(default)]
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileParams {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl User {
    pub async fn create(input: CreateUser, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, email, full_name, role, agency_id, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(input.email)
        .bind(input.full_name)
        .bind(input.role)
        .bind(input.agency_id)
        .bind(input.phone)
        .bind(input.password_hash)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_optional(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn email_taken(email: &str, pool: &PgPool) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// User by id, only if it belongs to the agency
    pub async fn find_in_agency(
        id: UserId,
        agency_id: AgencyId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1 AND agency_id = $2")
            .bind(id)
            .bind(agency_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Owners and admins of an agency, oldest first
    pub async fn list_staff(agency_id: AgencyId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM users
            WHERE agency_id = $1 AND role IN ('agency_owner', 'agency_admin')
            ORDER BY created_at ASC
            "#,
        )
        .bind(agency_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_profile(
        id: UserId,
        params: UpdateProfileParams,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(params.full_name)
        .bind(params.phone)
        .bind(params.avatar_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_role(id: UserId, role: Role, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_password_hash(id: UserId, password_hash: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(id: UserId, conn: &mut PgConnection) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
