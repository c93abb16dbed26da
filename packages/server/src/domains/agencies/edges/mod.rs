use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::common::AppResult;
use crate::domains::agencies::activities;
use crate::domains::agencies::models::UpdateAgencyParams;
use crate::domains::agencies::AgencyData;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/agency", get(get_agency).patch(update_agency))
        .with_state(deps)
}

async fn get_agency(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<AgencyData>> {
    let agency = activities::get_agency(&user, &deps).await?;
    Ok(Json(agency.into()))
}

async fn update_agency(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(params): Json<UpdateAgencyParams>,
) -> AppResult<Json<AgencyData>> {
    let agency = activities::update_agency(&user, params, &deps).await?;
    Ok(Json(agency.into()))
}
