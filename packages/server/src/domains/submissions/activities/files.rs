//! Uploads into the object store. Task files are scoped to a visible task,
//! avatars to the caller.

use chrono::Utc;

use crate::common::text::format_file_size;
use crate::common::{AppError, AppResult, TaskId};
use crate::domains::submissions::activities::storage_rules::{
    avatar_path, file_extension, is_own_avatar, task_file_path, task_id_from_path, validate_avatar,
    validate_file, AVATARS_BUCKET, TASK_FILES_BUCKET,
};
use crate::domains::submissions::data::UploadedFile;
use crate::domains::tasks::activities::visible_task;
use crate::domains::users::{UpdateProfileParams, User};
use crate::kernel::{ServerDeps, StoredObject};
use crate::server::middleware::AuthUser;

/// A file pulled out of a multipart request
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn uploaded(object: StoredObject, file: &FileUpload) -> UploadedFile {
    let size = file.bytes.len() as u64;
    UploadedFile {
        url: object.url,
        path: object.path,
        bucket: object.bucket,
        file_name: file.file_name.clone(),
        content_type: file.content_type.clone(),
        size,
        size_label: format_file_size(size),
    }
}

pub async fn upload_task_file(
    user: &AuthUser,
    task_id: TaskId,
    file: FileUpload,
    deps: &ServerDeps,
) -> AppResult<UploadedFile> {
    let (task, _) = visible_task(user, task_id, deps).await?;
    validate_file(&file.content_type, file.bytes.len())?;

    let ext = file_extension(&file.file_name, &file.content_type);
    let path = task_file_path(task.id, Utc::now().timestamp_millis(), &ext);
    let object = deps
        .object_store
        .put(TASK_FILES_BUCKET, &path, file.bytes.clone(), &file.content_type)
        .await?;

    tracing::info!(task_id = %task.id, path = %object.path, size = file.bytes.len(), "Task file uploaded");
    Ok(uploaded(object, &file))
}

/// Replace the caller's avatar and point their profile at it
pub async fn upload_avatar(
    user: &AuthUser,
    file: FileUpload,
    deps: &ServerDeps,
) -> AppResult<(UploadedFile, User)> {
    validate_avatar(&file.content_type, file.bytes.len())?;

    let existing = User::find_by_id(user.user_id, &deps.db_pool).await?;
    let ext = file_extension(&file.file_name, &file.content_type);
    let path = avatar_path(user.user_id, &ext);

    deps.object_store.delete(AVATARS_BUCKET, &path).await?;
    let object = deps
        .object_store
        .put(AVATARS_BUCKET, &path, file.bytes.clone(), &file.content_type)
        .await?;

    // A previous avatar with another extension would otherwise linger
    let previous = existing
        .avatar_url
        .as_deref()
        .and_then(|url| url.rsplit_once("/avatars/avatar-").map(|(_, name)| name))
        .map(|name| format!("avatars/avatar-{}", name))
        .filter(|old| *old != path);
    if let Some(old) = previous {
        if let Err(e) = deps.object_store.delete(AVATARS_BUCKET, &old).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "Failed to remove previous avatar");
        }
    }

    let profile = User::update_profile(
        user.user_id,
        UpdateProfileParams {
            avatar_url: Some(object.url.clone()),
            ..Default::default()
        },
        &deps.db_pool,
    )
    .await?;

    tracing::info!(user_id = %user.user_id, path = %object.path, "Avatar updated");
    Ok((uploaded(object, &file), profile))
}

/// Remove an object the caller owns: a file of a visible task, or their avatar
pub async fn delete_file(
    user: &AuthUser,
    bucket: &str,
    path: &str,
    deps: &ServerDeps,
) -> AppResult<()> {
    match bucket {
        TASK_FILES_BUCKET => {
            let task_id =
                task_id_from_path(path).ok_or_else(|| AppError::not_found("File not found"))?;
            visible_task(user, task_id, deps)
                .await
                .map_err(|_| AppError::not_found("File not found"))?;
        }
        AVATARS_BUCKET => {
            if !is_own_avatar(path, user.user_id) {
                return Err(AppError::Forbidden(
                    "You can only delete your own avatar".to_string(),
                ));
            }
        }
        _ => return Err(AppError::not_found("Unknown bucket")),
    }

    deps.object_store.delete(bucket, path).await?;
    tracing::info!(bucket, path, user_id = %user.user_id, "File deleted");
    Ok(())
}
