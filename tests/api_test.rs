mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{Factory, TestApp};
use knot::models::{NewParameter, ParamKind};

#[tokio::test]
async fn test_create_api() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;

    let response = app
        .server
        .post("/api/apis")
        .json(&json!({
            "groupId": group.id,
            "name": "Get Users",
            "endpoint": "/users",
            "method": "GET",
            "type": "HTTP"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"].as_str().unwrap(), "Get Users");
    assert_eq!(body["method"].as_str().unwrap(), "GET");
    assert_eq!(body["endpoint"].as_str().unwrap(), "/users");
    assert_eq!(body["type"].as_str().unwrap(), "HTTP");
    assert_eq!(body["groupId"].as_i64().unwrap(), group.id as i64);
}

#[tokio::test]
async fn test_create_rpc_api_without_method() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;

    let response = app
        .server
        .post("/api/apis")
        .json(&json!({
            "groupId": group.id,
            "name": "Transfer",
            "endpoint": "wallet.Transfer",
            "type": "RPC"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["method"].as_str().unwrap(), "");
}

#[tokio::test]
async fn test_create_http_api_requires_method() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;

    let response = app
        .server
        .post("/api/apis")
        .json(&json!({
            "groupId": group.id,
            "name": "Get Users",
            "endpoint": "/users",
            "type": "HTTP"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"], "Method is required for HTTP APIs");
}

#[tokio::test]
async fn test_create_api_rejects_bad_input() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;

    let missing_name = app
        .server
        .post("/api/apis")
        .json(&json!({ "groupId": group.id, "endpoint": "/x", "method": "GET", "type": "HTTP" }))
        .await;
    missing_name.assert_status(StatusCode::BAD_REQUEST);

    let bad_type = app
        .server
        .post("/api/apis")
        .json(&json!({ "groupId": group.id, "name": "x", "endpoint": "/x", "type": "SOAP" }))
        .await;
    bad_type.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_api_unknown_group() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/apis")
        .json(&json!({
            "groupId": 4242,
            "name": "Test API",
            "endpoint": "/test",
            "method": "GET",
            "type": "HTTP"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_api_with_group_and_parameters() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group_with_name("accounts").await;
    let api = factory.create_api(group.id).await;
    factory
        .set_parameters(
            api.id,
            "request",
            &[
                NewParameter::new("username", ParamKind::String),
                NewParameter::new("password", ParamKind::String),
            ],
        )
        .await;

    let response = app.server.get(&format!("/api/apis/{}", api.id)).await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["id"].as_i64().unwrap(), api.id as i64);
    assert_eq!(body["group"]["name"], "accounts");

    let params = body["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0]["name"], "username");
    assert_eq!(params[0]["paramType"], "request");
    assert_eq!(params[1]["name"], "password");
}

#[tokio::test]
async fn test_get_api_not_found() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/apis/9999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_list_apis_by_group_and_reorder() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let other = factory.create_group().await;
    let a = factory.create_api(group.id).await;
    let b = factory.create_api(group.id).await;
    factory.create_api(other.id).await;

    let body: Vec<serde_json::Value> = app
        .server
        .get(&format!("/api/apis/group/{}", group.id))
        .await
        .json();
    let ids: Vec<i64> = body.iter().map(|a| a["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [a.id as i64, b.id as i64]);

    let response = app
        .server
        .post("/api/apis/orders")
        .json(&json!({
            "apiOrders": [
                { "id": a.id, "order": 5 },
                { "id": b.id, "order": 1 }
            ]
        }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Vec<serde_json::Value> = app
        .server
        .get(&format!("/api/apis/group/{}", group.id))
        .await
        .json();
    let ids: Vec<i64> = body.iter().map(|a| a["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [b.id as i64, a.id as i64]);
}

#[tokio::test]
async fn test_update_api() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let api = factory.create_api(group.id).await;

    let response = app
        .server
        .patch(&format!("/api/apis/{}", api.id))
        .json(&json!({ "name": "Renamed", "method": "PUT" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["endpoint"], api.endpoint.as_str());
}

#[tokio::test]
async fn test_update_api_rejects_blank_method_for_http() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let api = factory.create_api(group.id).await;

    let response = app
        .server
        .patch(&format!("/api/apis/{}", api.id))
        .json(&json!({ "method": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_api_note() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let api = factory.create_api(group.id).await;

    let response = app
        .server
        .patch(&format!("/api/apis/{}/note", api.id))
        .json(&json!({ "note": "Rate limited to 10 rps" }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["note"], "Rate limited to 10 rps");

    let response = app
        .server
        .patch(&format!("/api/apis/{}/note", api.id))
        .json(&json!({ "note": null }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["note"].is_null());
}

#[tokio::test]
async fn test_delete_api() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let group = factory.create_group().await;
    let api = factory.create_api(group.id).await;

    let response = app.server.delete(&format!("/api/apis/{}", api.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app.server.get(&format!("/api/apis/{}", api.id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}
