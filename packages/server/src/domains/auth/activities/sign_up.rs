use crate::common::text::{is_valid_email, non_blank, normalize_email, slugify};
use crate::common::{AppError, AppResult, Role};
use crate::domains::agencies::models::agency::DEFAULT_BILLING_COUNTRY;
use crate::domains::agencies::{Agency, CreateAgency};
use crate::domains::auth::activities::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::domains::auth::activities::session::issue_session;
use crate::domains::auth::data::SignUpInput;
use crate::domains::auth::AuthSession;
use crate::domains::users::{CreateUser, User};
use crate::kernel::ServerDeps;

/// Create an agency and its owner in one transaction, then sign the owner in.
pub async fn sign_up(input: SignUpInput, deps: &ServerDeps) -> AppResult<AuthSession> {
    let email = normalize_email(&input.email);
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("A valid email is required"));
    }
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    let full_name = non_blank(Some(&input.full_name))
        .ok_or_else(|| AppError::bad_request("Full name is required"))?;
    let agency_name = non_blank(Some(&input.agency.name))
        .ok_or_else(|| AppError::bad_request("Agency name is required"))?;
    let slug = slugify(input.agency.slug.as_deref().unwrap_or(&agency_name));
    if slug.is_empty() {
        return Err(AppError::bad_request("Agency slug is required"));
    }

    if User::email_taken(&email, &deps.db_pool).await? {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }
    if Agency::slug_taken(&slug, &deps.db_pool).await? {
        return Err(AppError::Conflict(format!("Slug '{}' is already taken", slug)));
    }

    let password_hash = hash_password(&input.password).await?;
    let billing_country = non_blank(input.agency.billing_country.as_deref())
        .unwrap_or_else(|| DEFAULT_BILLING_COUNTRY.to_string());

    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;

    let agency = Agency::create(
        CreateAgency::builder()
            .name(agency_name)
            .slug(slug)
            .website(non_blank(input.agency.website.as_deref()))
            .phone(non_blank(input.agency.phone.as_deref()))
            .billing_address(non_blank(input.agency.billing_address.as_deref()))
            .billing_city(non_blank(input.agency.billing_city.as_deref()))
            .billing_zip(non_blank(input.agency.billing_zip.as_deref()))
            .billing_country(Some(billing_country))
            .build(),
        &mut *tx,
    )
    .await?;

    let owner = User::create(
        CreateUser::builder()
            .email(email)
            .full_name(full_name)
            .role(Role::AgencyOwner)
            .agency_id(agency.id)
            .phone(non_blank(input.phone.as_deref()))
            .password_hash(Some(password_hash))
            .build(),
        &mut *tx,
    )
    .await?;

    tx.commit().await.map_err(AppError::from)?;

    tracing::info!(agency_id = %agency.id, user_id = %owner.id, "Agency signed up");
    issue_session(owner, deps).await
}
