use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::common::{AppError, AppResult};
use crate::domains::submissions::activities::storage_rules::{
    resolve_content_type, MAX_FILE_SIZE,
};
use crate::domains::submissions::activities::{self, FileUpload};
use crate::domains::submissions::data::{SubmissionData, SubmitTaskInput, UploadedFile};
use crate::domains::tasks::edges::parse_task_id;
use crate::domains::tasks::TaskData;
use crate::domains::users::UserData;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

// Headroom for multipart framing so the size rule, not the body limit, decides
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 1024 * 1024;

pub fn router(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route(
            "/tasks/:id/submissions",
            get(list_submissions).post(submit_task),
        )
        .route(
            "/tasks/:id/files",
            post(upload_task_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/auth/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/files/:bucket/*path", delete(delete_file))
        .with_state(deps)
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    submission: SubmissionData,
    task: TaskData,
}

#[derive(Debug, Serialize)]
struct AvatarResponse {
    #[serde(flatten)]
    file: UploadedFile,
    profile: UserData,
}

/// Pull the `file` part out of a multipart body
async fn read_file(mut multipart: Multipart) -> AppResult<FileUpload> {
    let map_err = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("File size must be less than 50MB".to_string())
        } else {
            AppError::bad_request(format!("Invalid multipart body: {}", e.body_text()))
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(map_err)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = resolve_content_type(field.content_type(), &file_name);
        let bytes = field.bytes().await.map_err(map_err)?.to_vec();
        return Ok(FileUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::bad_request("Missing file field"))
}

async fn list_submissions(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SubmissionData>>> {
    let submissions = activities::list_submissions(&user, parse_task_id(&id)?, &deps).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

async fn submit_task(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<SubmitTaskInput>,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let (submission, task) =
        activities::submit_task(&user, parse_task_id(&id)?, input, &deps).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission: submission.into(),
            task: task.into(),
        }),
    ))
}

async fn upload_task_file(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadedFile>)> {
    let task_id = parse_task_id(&id)?;
    let file = read_file(multipart).await?;
    let uploaded = activities::upload_task_file(&user, task_id, file, &deps).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

async fn upload_avatar(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<AvatarResponse>> {
    let file = read_file(multipart).await?;
    let (file, profile) = activities::upload_avatar(&user, file, &deps).await?;
    Ok(Json(AvatarResponse {
        file,
        profile: profile.into(),
    }))
}

async fn delete_file(
    State(deps): State<Arc<ServerDeps>>,
    user: AuthUser,
    Path((bucket, path)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    activities::delete_file(&user, &bucket, path.trim_start_matches('/'), &deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
