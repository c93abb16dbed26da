//! Creating and reading notifications.
//!
//! Notifications are a side effect: the `notify_*` helpers log failures
//! instead of failing the operation that triggered them.

use sqlx::PgPool;

use crate::common::{AppError, AppResult, NotificationId, TaskId, UserId};
use crate::domains::notifications::data::NotificationList;
use crate::domains::notifications::models::{CreateNotification, Notification, NotificationType};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

const LIST_LIMIT: i64 = 50;

async fn notify(input: CreateNotification, pool: &PgPool) {
    let user_id = input.user_id;
    if let Err(e) = Notification::create(input, pool).await {
        tracing::warn!(user_id = %user_id, error = %e, "Failed to create notification");
    }
}

pub async fn notify_task_assigned(
    user_id: UserId,
    client_name: &str,
    task_count: usize,
    pool: &PgPool,
) {
    notify(
        CreateNotification::builder()
            .user_id(user_id)
            .title("New client assigned")
            .message(format!(
                "{} has been assigned to you with {} onboarding task{}",
                client_name,
                task_count,
                if task_count == 1 { "" } else { "s" }
            ))
            .notification_type(NotificationType::TaskAssigned)
            .build(),
        pool,
    )
    .await
}

pub async fn notify_task_completed(
    user_id: UserId,
    task_id: TaskId,
    task_title: &str,
    client_name: &str,
    pool: &PgPool,
) {
    notify(
        CreateNotification::builder()
            .user_id(user_id)
            .title("Task completed")
            .message(format!("{} completed \"{}\"", client_name, task_title))
            .notification_type(NotificationType::TaskCompleted)
            .related_task_id(Some(task_id))
            .build(),
        pool,
    )
    .await
}

pub async fn notify_task_overdue(
    user_id: UserId,
    task_id: TaskId,
    task_title: &str,
    client_name: &str,
    pool: &PgPool,
) {
    notify(
        CreateNotification::builder()
            .user_id(user_id)
            .title("Task overdue")
            .message(format!("\"{}\" for {} is past its due date", task_title, client_name))
            .notification_type(NotificationType::TaskOverdue)
            .related_task_id(Some(task_id))
            .build(),
        pool,
    )
    .await
}

pub async fn notify_message_received(
    user_id: UserId,
    task_id: TaskId,
    task_title: &str,
    sender_name: &str,
    pool: &PgPool,
) {
    notify(
        CreateNotification::builder()
            .user_id(user_id)
            .title("New message")
            .message(format!("{} sent a message on \"{}\"", sender_name, task_title))
            .notification_type(NotificationType::MessageReceived)
            .related_task_id(Some(task_id))
            .build(),
        pool,
    )
    .await
}

pub async fn list_notifications(user: &AuthUser, deps: &ServerDeps) -> AppResult<NotificationList> {
    let notifications = Notification::list_for_user(user.user_id, LIST_LIMIT, &deps.db_pool).await?;
    let unread_count = Notification::count_unread(user.user_id, &deps.db_pool).await?;
    Ok(NotificationList {
        notifications: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    })
}

pub async fn mark_read(
    user: &AuthUser,
    id: NotificationId,
    deps: &ServerDeps,
) -> AppResult<Notification> {
    Notification::mark_read(id, user.user_id, &deps.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Notification not found"))
}

pub async fn mark_all_read(user: &AuthUser, deps: &ServerDeps) -> AppResult<u64> {
    Ok(Notification::mark_all_read(user.user_id, &deps.db_pool).await?)
}
