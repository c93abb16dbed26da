use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::common::{AppError, AppResult};
use crate::domains::analytics::activities;
use crate::domains::analytics::data::{AgencyAnalytics, AnalyticsQuery, TimeRange};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/analytics", get(agency_analytics))
        .with_state(deps)
}

async fn agency_analytics(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AgencyAnalytics>> {
    let range = match query.range.as_deref() {
        Some(raw) => raw.parse::<TimeRange>().map_err(AppError::bad_request)?,
        None => TimeRange::default(),
    };
    Ok(Json(activities::agency_analytics(&user, range, &deps).await?))
}
