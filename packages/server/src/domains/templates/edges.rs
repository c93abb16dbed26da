use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::common::{AppError, AppResult, TemplateId};
use crate::domains::templates::activities;
use crate::domains::templates::data::{
    CreateTemplateInput, ReorderTemplateTasksInput, UpdateTemplateInput,
};
use crate::domains::templates::TemplateData;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/:id",
            get(get_template).patch(update_template).delete(delete_template),
        )
        .route("/templates/:id/tasks/order", put(reorder_template_tasks))
        .with_state(deps)
}

fn parse_template_id(raw: &str) -> Result<TemplateId, AppError> {
    TemplateId::parse(raw).map_err(|_| AppError::not_found("Template not found"))
}

async fn list_templates(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<Vec<TemplateData>>> {
    let templates = activities::list_templates(&user, &deps).await?;
    Ok(Json(templates.into_iter().map(Into::into).collect()))
}

async fn create_template(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(input): Json<CreateTemplateInput>,
) -> AppResult<(StatusCode, Json<TemplateData>)> {
    let template = activities::create_template(&user, input, &deps).await?;
    Ok((StatusCode::CREATED, Json(template.into())))
}

async fn get_template(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<TemplateData>> {
    let template = activities::find_template(&user, parse_template_id(&id)?, &deps).await?;
    Ok(Json(template.into()))
}

async fn update_template(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateTemplateInput>,
) -> AppResult<Json<TemplateData>> {
    let template =
        activities::update_template(&user, parse_template_id(&id)?, input, &deps).await?;
    Ok(Json(template.into()))
}

async fn delete_template(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    activities::delete_template(&user, parse_template_id(&id)?, &deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_template_tasks(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ReorderTemplateTasksInput>,
) -> AppResult<Json<TemplateData>> {
    let template =
        activities::reorder_template_tasks(&user, parse_template_id(&id)?, input.task_ids, &deps)
            .await?;
    Ok(Json(template.into()))
}
