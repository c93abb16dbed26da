//! Task CRUD, ordering, summaries and the overdue scan.

mod common;

use crate::common::{
    create_client, create_task, create_template, ids, sign_up_agency, titles, TestHarness,
};
use chrono::{Duration, Utc};
use plankport_core::kernel::scheduled_tasks::run_overdue_scan;
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn new_tasks_go_to_the_end(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "append-task").await;
    let owner = api.authed(&agency.token);
    let client = create_client(&owner, json!({})).await;
    let client_id = client["id"].as_str().unwrap();

    let first = create_task(&owner, client_id, "First", json!({})).await;
    let second = create_task(&owner, client_id, "Second", json!({})).await;

    assert_eq!(first["status"], "pending");
    assert_eq!(first["badge_variant"], "default");
    assert_eq!(first["order_index"], 1);
    assert_eq!(second["order_index"], 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reorder_writes_dense_positions(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "reorder").await;
    let owner = api.authed(&agency.token);
    let template = create_template(&owner, "Flow", &["A", "B", "C"]).await;
    let client = create_client(&owner, json!({ "onboarding_template_id": template["id"] })).await;
    let client_id = client["id"].as_str().unwrap();

    let tasks = owner.get(&format!("/clients/{}/tasks", client_id)).await;
    let mut order = ids(&tasks.body);
    order.reverse();

    let reordered = owner
        .put(
            &format!("/clients/{}/tasks/order", client_id),
            json!({ "task_ids": order }),
        )
        .await;
    assert_eq!(reordered.status, 200);
    assert_eq!(titles(&reordered.body), vec!["C", "B", "A"]);
    assert_eq!(reordered.body[0]["order_index"], 1);
    assert_eq!(reordered.body[2]["order_index"], 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reorder_rejects_partial_lists(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "partial").await;
    let owner = api.authed(&agency.token);
    let template = create_template(&owner, "Flow", &["A", "B"]).await;
    let client = create_client(&owner, json!({ "onboarding_template_id": template["id"] })).await;
    let client_id = client["id"].as_str().unwrap();
    let path = format!("/clients/{}/tasks/order", client_id);

    let tasks = owner.get(&format!("/clients/{}/tasks", client_id)).await;
    let all = ids(&tasks.body);

    let missing = owner.put(&path, json!({ "task_ids": [all[0]] })).await;
    assert_eq!(missing.status, 400);

    let duplicated = owner
        .put(&path, json!({ "task_ids": [all[0], all[0]] }))
        .await;
    assert_eq!(duplicated.status, 400);

    let not_uuid = owner.put(&path, json!({ "task_ids": ["nope", all[1]] })).await;
    assert_eq!(not_uuid.status, 400);

    // Order unchanged after the failures
    let after = owner.get(&format!("/clients/{}/tasks", client_id)).await;
    assert_eq!(titles(&after.body), vec!["A", "B"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn move_task_shifts_neighbours(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "move").await;
    let owner = api.authed(&agency.token);
    let template = create_template(&owner, "Flow", &["A", "B", "C", "D"]).await;
    let client = create_client(&owner, json!({ "onboarding_template_id": template["id"] })).await;
    let path = format!("/clients/{}/tasks/move", client["id"].as_str().unwrap());

    let moved = owner.post(&path, json!({ "from": 0, "to": 2 })).await;
    assert_eq!(moved.status, 200);
    assert_eq!(titles(&moved.body), vec!["B", "C", "A", "D"]);

    let out_of_range = owner.post(&path, json!({ "from": 0, "to": 9 })).await;
    assert_eq!(out_of_range.status, 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_and_delete_task(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "crud").await;
    let owner = api.authed(&agency.token);
    let client = create_client(&owner, json!({})).await;
    let task = create_task(&owner, client["id"].as_str().unwrap(), "Edit me", json!({})).await;
    let path = format!("/tasks/{}", task["id"].as_str().unwrap());

    let updated = owner
        .patch(&path, json!({ "status": "blocked", "title": "Edited" }))
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["status"], "blocked");
    assert_eq!(updated.body["badge_variant"], "danger");
    assert_eq!(updated.body["title"], "Edited");

    let bad_metadata = owner.patch(&path, json!({ "metadata": [1, 2] })).await;
    assert_eq!(bad_metadata.status, 400);

    assert_eq!(owner.delete(&path).await.status, 204);
    assert_eq!(owner.get(&path).await.status, 404);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn agency_task_list_and_summary(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "summary").await;
    let owner = api.authed(&agency.token);
    let client = create_client(&owner, json!({ "full_name": "Summary Client" })).await;
    let client_id = client["id"].as_str().unwrap();

    let done = create_task(&owner, client_id, "Done", json!({})).await;
    create_task(&owner, client_id, "Open", json!({})).await;
    owner
        .patch(
            &format!("/tasks/{}", done["id"].as_str().unwrap()),
            json!({ "status": "completed" }),
        )
        .await;

    let summary = owner.get("/tasks/summary").await;
    assert_eq!(summary.status, 200);
    assert_eq!(summary.body["total"], 2);
    assert_eq!(summary.body["completed"], 1);
    assert_eq!(summary.body["pending"], 1);

    let completed = owner.get("/tasks?status=completed").await;
    assert_eq!(titles(&completed.body), vec!["Done"]);
    assert_eq!(completed.body[0]["client_name"], "Summary Client");

    let searched = owner.get("/tasks?search=open").await;
    assert_eq!(titles(&searched.body), vec!["Open"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn overdue_scan_notifies_assignee_once(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "overdue").await;
    let owner = api.authed(&agency.token);
    let client = create_client(&owner, json!({ "assigned_user_id": agency.owner_id })).await;
    let task = create_task(&owner, client["id"].as_str().unwrap(), "Late", json!({})).await;
    owner
        .patch(
            &format!("/tasks/{}", task["id"].as_str().unwrap()),
            json!({ "due_date": (Utc::now() - Duration::days(1)).to_rfc3339() }),
        )
        .await;

    run_overdue_scan(&ctx.db_pool).await.unwrap();
    run_overdue_scan(&ctx.db_pool).await.unwrap();

    let notifications = owner.get("/notifications").await;
    let overdue: Vec<_> = notifications.body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["type"] == "task_overdue")
        .collect();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0]["related_task_id"], task["id"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn analytics_counts_agency_activity(ctx: &TestHarness) {
    let api = ctx.api();
    let agency = sign_up_agency(&api, "analytics").await;
    let owner = api.authed(&agency.token);
    let template = create_template(&owner, "Flow", &["A", "B"]).await;
    let client = create_client(&owner, json!({ "onboarding_template_id": template["id"] })).await;

    let tasks = owner
        .get(&format!("/clients/{}/tasks", client["id"].as_str().unwrap()))
        .await;
    owner
        .patch(
            &format!("/tasks/{}", tasks.body[0]["id"].as_str().unwrap()),
            json!({ "status": "completed" }),
        )
        .await;

    let analytics = owner.get("/analytics?range=7d").await;
    assert_eq!(analytics.status, 200);
    assert_eq!(analytics.body["range"], "7d");
    assert_eq!(analytics.body["clients"]["total"], 1);
    assert_eq!(analytics.body["tasks"]["total"], 2);
    assert_eq!(analytics.body["tasks"]["completed"], 1);
    assert_eq!(analytics.body["completion_rate"], 50.0);
    assert_eq!(analytics.body["task_type_breakdown"]["manual_task"], 2);
    assert_eq!(analytics.body["recent_activity"]["new_clients"], 1);
    assert_eq!(analytics.body["recent_activity"]["completed_tasks"], 1);

    assert_eq!(owner.get("/analytics?range=2w").await.status, 400);
}
