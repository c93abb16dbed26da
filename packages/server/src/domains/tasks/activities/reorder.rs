//! Persisting drag-and-drop order.
//!
//! Every task of the client is rewritten with `order_index = position + 1`
//! inside one transaction.

use sqlx::PgConnection;

use crate::common::ordering::{move_item, sequential_order, validate_permutation};
use crate::common::{Actor, AppError, AppResult, Capability, ClientId, TaskId};
use crate::domains::clients::activities::visible_client;
use crate::domains::tasks::models::Task;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// Store `ordered_ids` (a permutation of the client's task ids) as the new order
pub async fn reorder_tasks(
    user: &AuthUser,
    client_id: ClientId,
    ordered_ids: Vec<TaskId>,
    deps: &ServerDeps,
) -> AppResult<Vec<Task>> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageTasks)
        .check()?;
    let client = visible_client(user, client_id, deps).await?;

    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;
    let current = lock_task_ids(client.id, &mut *tx).await?;
    validate_permutation(&current, &ordered_ids)
        .map_err(|e| AppError::bad_request(e.to_string()))?;
    write_order(client.id, &ordered_ids, &mut *tx).await?;
    tx.commit().await.map_err(AppError::from)?;

    Ok(Task::list_for_client(client.id, &deps.db_pool).await?)
}

/// Move the task at position `from` to position `to` (zero-based)
pub async fn move_task(
    user: &AuthUser,
    client_id: ClientId,
    from: usize,
    to: usize,
    deps: &ServerDeps,
) -> AppResult<Vec<Task>> {
    Actor::new(user.user_id, user.role)
        .can(Capability::ManageTasks)
        .check()?;
    let client = visible_client(user, client_id, deps).await?;

    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;
    let mut ids = lock_task_ids(client.id, &mut *tx).await?;
    move_item(&mut ids, from, to).map_err(|e| AppError::bad_request(e.to_string()))?;
    write_order(client.id, &ids, &mut *tx).await?;
    tx.commit().await.map_err(AppError::from)?;

    Ok(Task::list_for_client(client.id, &deps.db_pool).await?)
}

async fn lock_task_ids(client_id: ClientId, conn: &mut PgConnection) -> AppResult<Vec<TaskId>> {
    // Serialise concurrent reorders of the same client
    sqlx::query("SELECT id FROM clients WHERE id = $1 FOR UPDATE")
        .bind(client_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::from)?;
    Ok(Task::ids_for_client(client_id, conn).await?)
}

async fn write_order(
    client_id: ClientId,
    ids: &[TaskId],
    conn: &mut PgConnection,
) -> AppResult<()> {
    let order = sequential_order(ids);
    let written = Task::apply_order(client_id, &order, conn).await?;
    tracing::info!(client_id = %client_id, tasks = written, "Task order saved");
    Ok(())
}
