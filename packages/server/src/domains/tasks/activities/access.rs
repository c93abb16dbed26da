//! Row visibility for tasks.
//!
//! Staff see tasks of their agency's clients; portal users see only the tasks
//! of their own client record. Anything else is reported as not found.

use crate::common::{AppError, AppResult, TaskId};
use crate::domains::clients::Client;
use crate::domains::tasks::models::Task;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub async fn visible_task(
    user: &AuthUser,
    task_id: TaskId,
    deps: &ServerDeps,
) -> AppResult<(Task, Client)> {
    let not_found = || AppError::not_found("Task not found");

    let task = Task::find_optional(task_id, &deps.db_pool)
        .await?
        .ok_or_else(not_found)?;
    let client = Client::find_by_id(task.client_id, &deps.db_pool).await?;

    let visible = if user.is_staff() {
        client.agency_id == user.agency_id
    } else {
        client.user_id == Some(user.user_id)
    };

    if visible {
        Ok((task, client))
    } else {
        Err(not_found())
    }
}
