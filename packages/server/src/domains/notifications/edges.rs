use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::common::{AppError, AppResult, NotificationId};
use crate::domains::notifications::activities;
use crate::domains::notifications::{NotificationData, NotificationList};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/:id/read", post(mark_read))
        .with_state(deps)
}

async fn list_notifications(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<NotificationList>> {
    Ok(Json(activities::list_notifications(&user, &deps).await?))
}

async fn mark_read(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationData>> {
    let id = NotificationId::parse(&id).map_err(|_| AppError::not_found("Notification not found"))?;
    let notification = activities::mark_read(&user, id, &deps).await?;
    Ok(Json(notification.into()))
}

async fn mark_all_read(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let updated = activities::mark_all_read(&user, &deps).await?;
    Ok(Json(json!({ "updated": updated })))
}
