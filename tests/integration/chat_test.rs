//! Chat API integration tests
//!
//! Request/response endpoints plus the websocket endpoint, which needs a
//! real socket so those tests use `TestApp::over_http`.

use axum_test::WsMessage;
use serde_json::{json, Value};

use crate::common::{assert_status, TestApp};

#[tokio::test]
async fn test_model_info() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("writer@example.com", "writer").await;

    let response = app.server.get("/api/chat/model").authorization_bearer(&token).await;
    assert_status(&response, 200);
    let info: Value = response.json();
    assert_eq!(info["model"], "fake-claude-demo");
    assert!(info["capabilities"].as_array().is_some_and(|c| !c.is_empty()));
}

#[tokio::test]
async fn test_chat_keyword_routing() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/chat")
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "message": "Can you help with my introduction?" }))
        .await;
    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body["model"], "fake-claude-demo");
    assert!(body["message"].as_str().unwrap().contains("introduction"));
}

#[tokio::test]
async fn test_chat_with_inaccessible_file_still_answers() {
    let app = TestApp::new().await;
    let (_, outsider) = app.create_user("outsider@example.com", "writer").await;
    let project = app.create_project("Private").await;
    let file = app.create_file(&app.admin_token, project, "secret", "classified").await;

    let response = app
        .server
        .post("/api/chat")
        .authorization_bearer(&outsider)
        .json(&json!({
            "message": "summarize this",
            "project_id": project,
            "file_id": file["id"],
        }))
        .await;
    assert_status(&response, 200);
    assert!(!response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .contains("classified"));
}

#[tokio::test]
async fn test_chat_requires_token() {
    let app = TestApp::new().await;
    let response = app.server.post("/api/chat").json(&json!({ "message": "hi" })).await;
    assert_status(&response, 401);
}

fn close_code(message: WsMessage) -> u16 {
    match message {
        WsMessage::Close(Some(frame)) => u16::from(frame.code),
        other => panic!("expected close frame, got {:?}", other),
    }
}

#[tokio::test]
async fn test_websocket_rejects_bad_token() {
    let app = TestApp::over_http().await;

    let mut socket = app
        .server
        .get_websocket("/api/chat/ws")
        .add_query_param("token", "not-a-jwt")
        .await
        .into_websocket()
        .await;

    assert_eq!(close_code(socket.receive_message().await), 4001);
}

#[tokio::test]
async fn test_websocket_rejects_missing_token() {
    let app = TestApp::over_http().await;

    let mut socket = app
        .server
        .get_websocket("/api/chat/ws")
        .await
        .into_websocket()
        .await;

    assert_eq!(close_code(socket.receive_message().await), 4001);
}

#[tokio::test]
async fn test_websocket_rejects_inactive_user() {
    let app = TestApp::over_http().await;
    let (user_id, token) = app.create_user("writer@example.com", "writer").await;
    let response = app
        .server
        .patch(&format!("/api/users/{}", user_id))
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "is_active": false }))
        .await;
    assert_status(&response, 200);

    let mut socket = app
        .server
        .get_websocket("/api/chat/ws")
        .add_query_param("token", &token)
        .await
        .into_websocket()
        .await;

    assert_eq!(close_code(socket.receive_message().await), 4001);
}

#[tokio::test]
async fn test_websocket_streams_a_turn() {
    let app = TestApp::over_http().await;
    let (_, token) = app.create_user("writer@example.com", "writer").await;

    let mut socket = app
        .server
        .get_websocket("/api/chat/ws")
        .add_query_param("token", &token)
        .await
        .into_websocket()
        .await;

    socket
        .send_json(&json!({ "message": "Can you help with my introduction?" }))
        .await;

    let start: Value = socket.receive_json().await;
    assert_eq!(start["type"], "start");
    assert_eq!(start["model"], "fake-claude-demo");

    let mut tokens = String::new();
    let end = loop {
        let event: Value = socket.receive_json().await;
        match event["type"].as_str() {
            Some("token") => tokens.push_str(event["content"].as_str().unwrap()),
            Some("end") => break event,
            other => panic!("unexpected event {:?}", other),
        }
    };

    assert!(!tokens.is_empty());
    assert_eq!(end["full_response"], tokens);
    assert!(tokens.contains("introduction"));
}
