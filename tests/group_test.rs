mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/health").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_group() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/groups")
        .json(&json!({ "name": "  user-service  " }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"].as_str().unwrap(), "user-service");
    assert!(body["id"].as_i64().is_some());
    assert!(body["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_create_group_requires_name() {
    let app = TestApp::new().await;

    let response = app.server.post("/api/groups").json(&json!({ "name": "  " })).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app.server.post("/api/groups").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_group_duplicate_name() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    factory.create_group_with_name("payments").await;

    let response = app
        .server
        .post("/api/groups")
        .json(&json!({ "name": "payments" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn test_list_groups_in_display_order() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let first = factory.create_group_with_name("first").await;
    let second = factory.create_group_with_name("second").await;

    let response = app.server.get("/api/groups").await;
    response.assert_status(StatusCode::OK);

    let body: Vec<serde_json::Value> = response.json();
    let ids: Vec<i64> = body.iter().map(|g| g["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [first.id as i64, second.id as i64]);

    // Swap them
    let response = app
        .server
        .post("/api/groups/orders")
        .json(&json!({
            "groupOrders": [
                { "id": first.id, "order": 2 },
                { "id": second.id, "order": 1 }
            ]
        }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Vec<serde_json::Value> = app.server.get("/api/groups").await.json();
    let ids: Vec<i64> = body.iter().map(|g| g["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [second.id as i64, first.id as i64]);
}

#[tokio::test]
async fn test_list_groups_empty_is_array() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/groups").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_groups_with_apis() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let empty = factory.create_group().await;
    let a = factory.create_api_with(group.id, "Login", "/auth/login").await;
    let b = factory.create_api_with(group.id, "Logout", "/auth/logout").await;

    let response = app.server.get("/api/groups/with-apis").await;
    response.assert_status(StatusCode::OK);

    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["id"].as_i64().unwrap(), group.id as i64);
    let api_ids: Vec<i64> = body[0]["apis"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(api_ids, [a.id as i64, b.id as i64]);

    assert_eq!(body[1]["id"].as_i64().unwrap(), empty.id as i64);
    assert_eq!(body[1]["apis"], json!([]));
}

#[tokio::test]
async fn test_rename_group() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;

    let response = app
        .server
        .patch(&format!("/api/groups/{}", group.id))
        .json(&json!({ "name": "renamed" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "renamed");
    assert_eq!(body["id"].as_i64().unwrap(), group.id as i64);
}

#[tokio::test]
async fn test_rename_group_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .patch("/api/groups/9999")
        .json(&json!({ "name": "renamed" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_group_cascades() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let api = factory.create_api(group.id).await;

    let response = app.server.delete(&format!("/api/groups/{}", group.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app.server.get(&format!("/api/apis/{}", api.id)).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = app.server.delete(&format!("/api/groups/{}", group.id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}
