use crate::common::text::normalize_email;
use crate::common::{AppResult, AuthError};
use crate::domains::auth::activities::password::verify_password;
use crate::domains::auth::activities::session::issue_session;
use crate::domains::auth::data::SignInInput;
use crate::domains::auth::AuthSession;
use crate::domains::users::User;
use crate::kernel::ServerDeps;

/// Email + password sign-in. Every failure looks the same to the caller.
pub async fn sign_in(input: SignInInput, deps: &ServerDeps) -> AppResult<AuthSession> {
    let email = normalize_email(&input.email);
    let user = User::find_by_email(&email, &deps.db_pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&input.password, password_hash).await? {
        tracing::info!(user_id = %user.id, "Sign-in rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::info!(user_id = %user.id, "Signed in with password");
    issue_session(user, deps).await
}
