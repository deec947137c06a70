//! End-to-end flows the browser suite drives through the front end,
//! replayed against the full middleware stack.

mod common;

use axum::{http::StatusCode, Router};
use checkmark_api::{CheckmarkServer, Deployment, ServerConfig};
use serde_json::json;

use common::{login, send};

fn todos_app() -> Router {
    CheckmarkServer::new(ServerConfig::new(Deployment::Todos)).router()
}

async fn reset(router: &Router) {
    let (status, _) = send(router, "POST", "/reset-todos", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_create_and_list() {
    let router = todos_app();
    reset(&router).await;
    let token = login(&router).await;

    for text in ["Task A", "Task B"] {
        let (status, _) = send(&router, "POST", "/todos", Some(&token), Some(json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list) = send(&router, "GET", "/todos", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let todos = list.as_array().unwrap();
    let texts: Vec<&str> = todos.iter().map(|t| t["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["Task A", "Task B"]);
    assert!(todos.iter().all(|t| t["completed"] == false));
}

#[tokio::test]
async fn test_complete_then_delete() {
    let router = todos_app();
    reset(&router).await;
    let token = login(&router).await;

    send(&router, "POST", "/todos", Some(&token), Some(json!({ "text": "Task to complete" }))).await;
    send(&router, "POST", "/todos", Some(&token), Some(json!({ "text": "Task to delete" }))).await;

    let (status, toggled) = send(&router, "PUT", "/todos/1", Some(&token), Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["completed"], true);

    let (status, _) = send(&router, "DELETE", "/todos/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&router, "GET", "/todos", Some(&token), None).await;
    assert_eq!(list, json!([{ "id": 1, "text": "Task to complete", "completed": true }]));
}

#[tokio::test]
async fn test_empty_todo_is_not_added() {
    let router = todos_app();
    reset(&router).await;
    let token = login(&router).await;

    let (status, body) = send(&router, "POST", "/todos", Some(&token), Some(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Todo text is required.");

    let (_, list) = send(&router, "GET", "/todos", Some(&token), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_invalid_login_shows_message() {
    let router = todos_app();
    reset(&router).await;

    let (status, body) = send(
        &router,
        "POST",
        "/login",
        None,
        Some(json!({ "username": "wronguser", "password": "wrongpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password.");
}

#[tokio::test]
async fn test_edit_then_delete_last_todo() {
    let router = todos_app();
    reset(&router).await;
    let token = login(&router).await;

    let (_, created) = send(&router, "POST", "/todos", Some(&token), Some(json!({ "text": "Original todo" }))).await;
    let uri = format!("/todos/{}", created["id"]);

    let (status, edited) = send(&router, "PUT", &uri, Some(&token), Some(json!({ "text": "Edited todo" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["text"], "Edited todo");
    assert_eq!(edited["completed"], false);

    let (status, _) = send(&router, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&router, "GET", "/todos", Some(&token), None).await;
    assert_eq!(list, json!([]));
}
