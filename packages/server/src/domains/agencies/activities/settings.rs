//! Agency settings (branding, contact details, billing address).

use crate::common::text::{non_blank, slugify};
use crate::common::{Actor, AppError, AppResult, Capability};
use crate::domains::agencies::models::{Agency, UpdateAgencyParams};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// Any member of the agency may read its settings.
pub async fn get_agency(user: &AuthUser, deps: &ServerDeps) -> AppResult<Agency> {
    Ok(Agency::find_by_id(user.agency_id, &deps.db_pool).await?)
}

pub async fn update_agency(
    user: &AuthUser,
    mut params: UpdateAgencyParams,
    deps: &ServerDeps,
) -> AppResult<Agency> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageAgency)
        .check()?;

    if let Some(name) = params.name.as_deref() {
        params.name = Some(
            non_blank(Some(name)).ok_or_else(|| AppError::bad_request("Agency name is required"))?,
        );
    }

    if let Some(slug) = params.slug.take() {
        let slug = slugify(&slug);
        if slug.is_empty() {
            return Err(AppError::bad_request("Agency slug is required"));
        }
        let current = Agency::find_by_id(user.agency_id, &deps.db_pool).await?;
        if slug != current.slug && Agency::slug_taken(&slug, &deps.db_pool).await? {
            return Err(AppError::Conflict(format!("Slug '{}' is already taken", slug)));
        }
        params.slug = Some(slug);
    }

    let agency = Agency::update(user.agency_id, params, &deps.db_pool).await?;
    tracing::info!(agency_id = %agency.id, "Agency settings updated");
    Ok(agency)
}
