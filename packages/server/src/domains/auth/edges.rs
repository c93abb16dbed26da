use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::common::AppResult;
use crate::domains::auth::activities;
use crate::domains::auth::data::{MagicLinkRequest, MagicLinkVerifyInput, SignInInput, SignUpInput};
use crate::domains::auth::{AuthSession, SessionData};
use crate::domains::users::{UpdateProfileParams, UserData};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// Unauthenticated sign-in endpoints (rate limited when enabled)
pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/magic-link", post(request_magic_link))
        .route("/auth/magic-link/verify", post(verify_magic_link))
        .with_state(deps)
}

/// Endpoints for an already signed-in user
pub fn session_router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/auth/session", get(session))
        .route("/auth/profile", get(get_profile).patch(update_profile))
        .with_state(deps)
}

async fn sign_up(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<SignUpInput>,
) -> AppResult<(StatusCode, Json<AuthSession>)> {
    let session = activities::sign_up(input, &deps).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn sign_in(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<SignInInput>,
) -> AppResult<Json<AuthSession>> {
    Ok(Json(activities::sign_in(input, &deps).await?))
}

async fn request_magic_link(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<MagicLinkRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    activities::request_magic_link(&input.email, &deps).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "If an account exists, a sign-in link has been sent" })),
    ))
}

async fn verify_magic_link(
    State(deps): State<Arc<ServerDeps>>,
    Json(input): Json<MagicLinkVerifyInput>,
) -> AppResult<Json<AuthSession>> {
    Ok(Json(activities::verify_magic_link(&input.token, &deps).await?))
}

async fn session(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<SessionData>> {
    Ok(Json(activities::load_session(&user, &deps).await?))
}

async fn get_profile(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<UserData>> {
    let session = activities::load_session(&user, &deps).await?;
    Ok(Json(session.user))
}

async fn update_profile(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(params): Json<UpdateProfileParams>,
) -> AppResult<Json<UserData>> {
    let profile = activities::update_profile(&user, params, &deps).await?;
    Ok(Json(profile.into()))
}
