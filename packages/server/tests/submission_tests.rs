//! Task submissions and file storage.

mod common;

use crate::common::{
    create_client, create_task, sign_in, sign_up_agency, unique_email, ApiClient, TestHarness,
};
use serde_json::json;
use test_context::test_context;

struct PortalSetup {
    owner: ApiClient,
    portal: ApiClient,
    task_id: String,
}

async fn portal_setup(ctx: &TestHarness) -> PortalSetup {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "uploads").await;
    let owner = api.authed(&agency.token);
    let email = unique_email("uploader");
    let client = create_client(
        &owner,
        json!({
            "email": email,
            "portal_password": "client-secret-1",
            "assigned_user_id": agency.owner_id,
        }),
    )
    .await;
    let task = create_task(&owner, client["id"].as_str().unwrap(), "Send logo", json!({})).await;
    let token = sign_in(&api, &email, "client-secret-1").await;

    PortalSetup {
        owner,
        portal: api.authed(&token),
        task_id: task["id"].as_str().unwrap().to_string(),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn client_submission_completes_task_and_notifies_assignee(ctx: &TestHarness) {
    let setup = portal_setup(ctx).await;
    let path = format!("/tasks/{}/submissions", setup.task_id);

    let submitted = setup
        .portal
        .post(
            &path,
            json!({ "submission_type": "text", "content": "Here you go" }),
        )
        .await;
    assert_eq!(submitted.status, 201);
    assert_eq!(submitted.body["submission"]["content"], "Here you go");
    assert_eq!(submitted.body["task"]["status"], "completed");

    let listed = setup.owner.get(&path).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let notifications = setup.owner.get("/notifications").await;
    assert_eq!(notifications.body["notifications"][0]["type"], "task_completed");
    assert_eq!(
        notifications.body["notifications"][0]["related_task_id"],
        setup.task_id.as_str()
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submissions_need_content(ctx: &TestHarness) {
    let setup = portal_setup(ctx).await;
    let path = format!("/tasks/{}/submissions", setup.task_id);

    let blank = setup
        .portal
        .post(&path, json!({ "submission_type": "text", "content": "  " }))
        .await;
    assert_eq!(blank.status, 400);

    let no_file = setup
        .portal
        .post(&path, json!({ "submission_type": "file" }))
        .await;
    assert_eq!(no_file.status, 400);

    let task = setup.owner.get(&format!("/tasks/{}", setup.task_id)).await;
    assert_eq!(task.body["status"], "pending");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_then_delete_task_file(ctx: &TestHarness) {
    let setup = portal_setup(ctx).await;

    let uploaded = setup
        .portal
        .upload(
            &format!("/tasks/{}/files", setup.task_id),
            "logo.png",
            "image/png",
            b"\x89PNG fake image bytes",
        )
        .await;
    assert_eq!(uploaded.status, 200, "{}", uploaded.body);
    assert_eq!(uploaded.body["bucket"], "task-files");
    assert_eq!(uploaded.body["file_name"], "logo.png");
    assert_eq!(uploaded.body["content_type"], "image/png");
    let path = uploaded.body["path"].as_str().unwrap().to_string();
    assert!(path.starts_with(&format!("tasks/{}/", setup.task_id)));
    assert!(path.ends_with(".png"));
    assert!(ctx.mocks.object_store.contains("task-files", &path));

    let deleted = setup.portal.delete(&format!("/files/task-files/{}", path)).await;
    assert_eq!(deleted.status, 204);
    assert!(!ctx.mocks.object_store.contains("task-files", &path));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_rejects_unsupported_types(ctx: &TestHarness) {
    let setup = portal_setup(ctx).await;

    let response = setup
        .portal
        .upload(
            &format!("/tasks/{}/files", setup.task_id),
            "payload.exe",
            "application/x-msdownload",
            b"MZ",
        )
        .await;
    assert_eq!(response.status, 415);
    assert!(ctx.mocks.object_store.paths("task-files").is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn other_agency_cannot_upload_to_task(ctx: &TestHarness) {
    let setup = portal_setup(ctx).await;
    let api = ctx.api();
    let stranger = sign_up_agency(&api, "stranger").await;

    let response = api
        .authed(&stranger.token)
        .upload(
            &format!("/tasks/{}/files", setup.task_id),
            "logo.png",
            "image/png",
            b"bytes",
        )
        .await;
    assert_eq!(response.status, 404);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn avatar_upload_replaces_previous_file(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "avatars").await;
    let owner = api.authed(&agency.token);

    let first = owner.upload("/auth/avatar", "me.png", "image/png", b"png").await;
    assert_eq!(first.status, 200, "{}", first.body);
    let first_path = first.body["path"].as_str().unwrap().to_string();
    assert_eq!(first_path, format!("avatars/avatar-{}.png", agency.owner_id));
    assert_eq!(first.body["profile"]["avatar_url"], first.body["url"]);

    let second = owner.upload("/auth/avatar", "me.jpg", "image/jpeg", b"jpg").await;
    assert_eq!(second.status, 200);
    let second_path = second.body["path"].as_str().unwrap().to_string();

    assert!(!ctx.mocks.object_store.contains("avatars", &first_path));
    assert!(ctx.mocks.object_store.contains("avatars", &second_path));

    let not_image = owner
        .upload("/auth/avatar", "notes.pdf", "application/pdf", b"%PDF")
        .await;
    assert_eq!(not_image.status, 415);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cannot_delete_someone_elses_avatar(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "avatar-owner").await;
    let other = sign_up_agency(&api, "avatar-thief").await;

    let uploaded = api
        .authed(&agency.token)
        .upload("/auth/avatar", "me.png", "image/png", b"png")
        .await;
    let path = uploaded.body["path"].as_str().unwrap();

    let response = api
        .authed(&other.token)
        .delete(&format!("/files/avatars/{}", path))
        .await;
    assert_eq!(response.status, 403);
    assert!(ctx.mocks.object_store.contains("avatars", path));
}
