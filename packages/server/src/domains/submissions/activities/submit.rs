use crate::common::text::non_blank;
use crate::common::{AppError, AppResult, TaskId};
use crate::domains::notifications::activities::notify_task_completed;
use crate::domains::submissions::data::SubmitTaskInput;
use crate::domains::submissions::models::{CreateSubmission, SubmissionType, TaskSubmission};
use crate::domains::tasks::activities::visible_task;
use crate::domains::tasks::models::{Task, TaskStatus};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub async fn list_submissions(
    user: &AuthUser,
    task_id: TaskId,
    deps: &ServerDeps,
) -> AppResult<Vec<TaskSubmission>> {
    let (task, _) = visible_task(user, task_id, deps).await?;
    Ok(TaskSubmission::list_for_task(task.id, &deps.db_pool).await?)
}

/// Record a submission and complete the task in one transaction.
pub async fn submit_task(
    user: &AuthUser,
    task_id: TaskId,
    input: SubmitTaskInput,
    deps: &ServerDeps,
) -> AppResult<(TaskSubmission, Task)> {
    let (task, client) = visible_task(user, task_id, deps).await?;

    let content = non_blank(input.content.as_deref());
    let file_url = non_blank(input.file_url.as_deref());
    match input.submission_type {
        SubmissionType::Text if content.is_none() => {
            return Err(AppError::bad_request("Text submissions need content"));
        }
        SubmissionType::Link if content.is_none() => {
            return Err(AppError::bad_request("Link submissions need a URL"));
        }
        SubmissionType::File if file_url.is_none() => {
            return Err(AppError::bad_request("File submissions need a file_url"));
        }
        _ => {}
    }
    let metadata = input.metadata.unwrap_or_else(|| serde_json::json!({}));
    if !metadata.is_object() {
        return Err(AppError::bad_request("Submission metadata must be a JSON object"));
    }

    let mut tx = deps.db_pool.begin().await.map_err(AppError::from)?;
    let submission = TaskSubmission::create(
        CreateSubmission::builder()
            .task_id(task.id)
            .client_id(client.id)
            .submission_type(input.submission_type)
            .content(content)
            .file_url(file_url)
            .file_name(non_blank(input.file_name.as_deref()))
            .file_size(input.file_size)
            .metadata(metadata)
            .build(),
        &mut *tx,
    )
    .await?;
    let task = Task::set_status(task.id, TaskStatus::Completed, &mut *tx).await?;
    tx.commit().await.map_err(AppError::from)?;

    tracing::info!(
        task_id = %task.id,
        submission_id = %submission.id,
        "Task submitted"
    );

    if let Some(assignee) = client.assigned_user_id.filter(|a| *a != user.user_id) {
        notify_task_completed(assignee, task.id, &task.title, &client.full_name, &deps.db_pool)
            .await;
    }

    Ok((submission, task))
}
