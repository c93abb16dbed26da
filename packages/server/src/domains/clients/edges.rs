use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::common::{AppError, AppResult, ClientId};
use crate::domains::clients::activities;
use crate::domains::clients::data::{ApplyTemplateInput, CreateClientInput, DeleteClientQuery};
use crate::domains::clients::models::UpdateClientParams;
use crate::domains::clients::ClientData;
use crate::domains::tasks::TaskData;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/:id",
            get(get_client).patch(update_client).delete(delete_client),
        )
        .route("/clients/:id/apply-template", post(apply_template))
        .with_state(deps)
}

fn parse_client_id(raw: &str) -> Result<ClientId, AppError> {
    ClientId::parse(raw).map_err(|_| AppError::not_found("Client not found"))
}

async fn list_clients(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
) -> AppResult<Json<Vec<ClientData>>> {
    let clients = activities::list_clients(&user, &deps).await?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

async fn create_client(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Json(input): Json<CreateClientInput>,
) -> AppResult<(StatusCode, Json<ClientData>)> {
    let client = activities::create_client(&user, input, &deps).await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

async fn get_client(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ClientData>> {
    let client = activities::get_client(&user, parse_client_id(&id)?, &deps).await?;
    Ok(Json(client.into()))
}

async fn update_client(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(params): Json<UpdateClientParams>,
) -> AppResult<Json<ClientData>> {
    let client = activities::update_client(&user, parse_client_id(&id)?, params, &deps).await?;
    Ok(Json(client.into()))
}

async fn delete_client(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<DeleteClientQuery>,
) -> AppResult<StatusCode> {
    activities::delete_client(&user, parse_client_id(&id)?, query.confirm, &deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_template(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<ApplyTemplateInput>,
) -> AppResult<(StatusCode, Json<Vec<TaskData>>)> {
    let tasks =
        activities::apply_template(&user, parse_client_id(&id)?, input.template_id, &deps).await?;
    Ok((StatusCode::CREATED, Json(tasks.into_iter().map(Into::into).collect())))
}
