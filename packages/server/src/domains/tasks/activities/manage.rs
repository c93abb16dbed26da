//! Task CRUD for agency staff, plus read access for portal users.

use crate::common::text::non_blank;
use crate::common::{Actor, AppError, AppResult, Capability, ClientId, TaskId};
use crate::domains::clients::activities::visible_client;
use crate::domains::tasks::activities::access::visible_task;
use crate::domains::tasks::data::{AgencyTaskFilter, CreateTaskInput, TaskSummary};
use crate::domains::tasks::models::{CreateTask, Task, TaskStatus, TaskWithClient, UpdateTaskParams};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

fn require_manage(user: &AuthUser) -> AppResult<()> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageTasks)
        .check()?;
    Ok(())
}

/// A client's checklist in display order
pub async fn list_client_tasks(
    user: &AuthUser,
    client_id: ClientId,
    deps: &ServerDeps,
) -> AppResult<Vec<Task>> {
    let client = visible_client(user, client_id, deps).await?;
    Ok(Task::list_for_client(client.id, &deps.db_pool).await?)
}

pub async fn list_agency_tasks(
    user: &AuthUser,
    filter: AgencyTaskFilter,
    deps: &ServerDeps,
) -> AppResult<Vec<TaskWithClient>> {
    require_manage(user)?;
    let search = non_blank(filter.search.as_deref());
    Ok(Task::list_for_agency(user.agency_id, filter.status, search.as_deref(), &deps.db_pool).await?)
}

pub async fn task_summary(user: &AuthUser, deps: &ServerDeps) -> AppResult<TaskSummary> {
    require_manage(user)?;
    let counts = Task::count_by_status(user.agency_id, &deps.db_pool).await?;
    Ok(TaskSummary::from_counts(&counts))
}

pub async fn create_task(
    user: &AuthUser,
    client_id: ClientId,
    input: CreateTaskInput,
    deps: &ServerDeps,
) -> AppResult<Task> {
    require_manage(user)?;
    let client = visible_client(user, client_id, deps).await?;

    let title = non_blank(Some(&input.title))
        .ok_or_else(|| AppError::bad_request("Task title is required"))?;

    let mut conn = deps.db_pool.acquire().await.map_err(AppError::from)?;
    let order_index = match input.order_index {
        Some(index) => index,
        None => Task::next_order_index(client.id, &mut *conn).await?,
    };

    let task = Task::create(
        CreateTask::builder()
            .client_id(client.id)
            .title(title)
            .description(input.description.trim().to_string())
            .task_type(input.task_type)
            .order_index(order_index)
            .status(input.status.unwrap_or(TaskStatus::Pending))
            .required(input.required.unwrap_or(true))
            .due_date(input.due_date)
            .estimated_duration(input.estimated_duration)
            .instructions(non_blank(input.instructions.as_deref()))
            .metadata(input.metadata.unwrap_or_else(|| serde_json::json!({})))
            .build(),
        &mut *conn,
    )
    .await?;

    tracing::info!(task_id = %task.id, client_id = %client.id, "Task created");
    Ok(task)
}

pub async fn update_task(
    user: &AuthUser,
    task_id: TaskId,
    mut params: UpdateTaskParams,
    deps: &ServerDeps,
) -> AppResult<Task> {
    require_manage(user)?;
    let (task, _) = visible_task(user, task_id, deps).await?;

    if let Some(title) = params.title.as_deref() {
        params.title = Some(
            non_blank(Some(title)).ok_or_else(|| AppError::bad_request("Task title is required"))?,
        );
    }
    if let Some(metadata) = params.metadata.as_ref() {
        if !metadata.is_object() {
            return Err(AppError::bad_request("Task metadata must be a JSON object"));
        }
    }

    let updated = Task::update(task.id, params, &deps.db_pool).await?;
    if updated.status != task.status {
        tracing::info!(
            task_id = %updated.id,
            from = task.status.as_str(),
            to = updated.status.as_str(),
            "Task status changed"
        );
    }
    Ok(updated)
}

pub async fn delete_task(user: &AuthUser, task_id: TaskId, deps: &ServerDeps) -> AppResult<()> {
    require_manage(user)?;
    let (task, _) = visible_task(user, task_id, deps).await?;
    Task::delete(task.id, &deps.db_pool).await?;
    tracing::info!(task_id = %task.id, "Task deleted");
    Ok(())
}
