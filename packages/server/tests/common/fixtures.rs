//! Test fixtures built through the public API.

use serde_json::{json, Value};
use uuid::Uuid;

use super::ApiClient;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// An agency and its signed-in owner
pub struct TestAgency {
    pub agency_id: String,
    pub owner_id: String,
    pub owner_email: String,
    pub token: String,
}

/// Email that won't collide with other tests on the shared database
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

pub async fn sign_up_agency(api: &ApiClient, name: &str) -> TestAgency {
    let email = unique_email("owner");
    let response = api
        .post(
            "/auth/signup",
            json!({
                "email": email,
                "password": TEST_PASSWORD,
                "full_name": "Olivia Owner",
                "agency": {
                    "name": name,
                    "slug": format!("{}-{}", name, Uuid::new_v4().simple()),
                }
            }),
        )
        .await;
    assert_eq!(response.status, 201, "sign up failed: {}", response.body);

    TestAgency {
        agency_id: response.body["agency"]["id"].as_str().unwrap().to_string(),
        owner_id: response.body["user"]["id"].as_str().unwrap().to_string(),
        owner_email: email,
        token: response.body["token"].as_str().unwrap().to_string(),
    }
}

pub async fn sign_in(api: &ApiClient, email: &str, password: &str) -> String {
    let response = api
        .post("/auth/signin", json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status, 200, "sign in failed: {}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}

pub fn template_task(title: &str, order_index: i32) -> Value {
    json!({
        "title": title,
        "description": format!("{} description", title),
        "task_type": "manual_task",
        "order_index": order_index,
        "required": true,
    })
}

/// Template with the given task titles, in order
pub async fn create_template(api: &ApiClient, name: &str, titles: &[&str]) -> Value {
    let tasks: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| template_task(title, i as i32 + 1))
        .collect();
    let response = api
        .post("/templates", json!({ "name": name, "tasks": tasks }))
        .await;
    assert_eq!(response.status, 201, "template failed: {}", response.body);
    response.body
}

pub async fn create_client(api: &ApiClient, extra: Value) -> Value {
    let mut body = json!({
        "email": unique_email("client"),
        "full_name": "Casey Client",
        "company_name": "Client Co",
    });
    if let (Some(target), Some(source)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    let response = api.post("/clients", body).await;
    assert_eq!(response.status, 201, "client failed: {}", response.body);
    response.body
}

pub async fn create_task(api: &ApiClient, client_id: &str, title: &str, metadata: Value) -> Value {
    let response = api
        .post(
            &format!("/clients/{}/tasks", client_id),
            json!({
                "title": title,
                "task_type": "manual_task",
                "metadata": metadata,
            }),
        )
        .await;
    assert_eq!(response.status, 201, "task failed: {}", response.body);
    response.body
}

pub fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn titles(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}
