//! Session bootstrap and profile edits.

use tokio::time::timeout;

use crate::common::{AppError, AppResult, AuthError};
use crate::domains::agencies::Agency;
use crate::domains::auth::{AuthSession, SessionData};
use crate::domains::users::{UpdateProfileParams, User};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// Mint a JWT for a loaded user
pub async fn issue_session(user: User, deps: &ServerDeps) -> AppResult<AuthSession> {
    let agency = Agency::find_by_id(user.agency_id, &deps.db_pool).await?;
    let token = deps
        .jwt_service
        .create_token(user.id, user.agency_id, user.role, user.email.clone())?;

    Ok(AuthSession {
        token,
        user: user.into(),
        agency: agency.into(),
    })
}

/// Load the caller's profile, bounded by the configured timeout.
///
/// A slow store yields 503 and a deleted profile yields 401; there is no
/// placeholder profile.
pub async fn load_session(user: &AuthUser, deps: &ServerDeps) -> AppResult<SessionData> {
    match timeout(deps.profile_timeout, fetch_profile(user, deps)).await {
        Err(_) => {
            tracing::warn!(
                user_id = %user.user_id,
                timeout_ms = deps.profile_timeout.as_millis() as u64,
                "Profile fetch timed out"
            );
            Err(AppError::ServiceUnavailable(
                "Profile fetch timed out".to_string(),
            ))
        }
        Ok(Err(e)) => Err(e.into()),
        Ok(Ok(None)) => Err(AuthError::ProfileNotFound.into()),
        Ok(Ok(Some((profile, agency)))) => Ok(SessionData {
            user: profile.into(),
            agency: agency.into(),
        }),
    }
}

async fn fetch_profile(
    user: &AuthUser,
    deps: &ServerDeps,
) -> anyhow::Result<Option<(User, Agency)>> {
    let Some(profile) = User::find_optional(user.user_id, &deps.db_pool).await? else {
        return Ok(None);
    };
    let agency = Agency::find_by_id(profile.agency_id, &deps.db_pool).await?;
    Ok(Some((profile, agency)))
}

pub async fn update_profile(
    user: &AuthUser,
    mut params: UpdateProfileParams,
    deps: &ServerDeps,
) -> AppResult<User> {
    if let Some(name) = params.full_name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Full name cannot be empty"));
        }
        params.full_name = Some(name.to_string());
    }

    Ok(User::update_profile(user.user_id, params, &deps.db_pool).await?)
}
