//! Authentication API integration tests

use serde_json::{json, Value};

use crate::common::{assert_error, assert_status, TestApp, ADMIN_EMAIL};

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": "new@example.com",
            "password": "password123",
            "full_name": "New Writer"
        }))
        .await;
    assert_status(&response, 201);
    let body: Value = response.json();
    assert_eq!(body["role"]["name"], "writer");
    assert!(body.get("hashed_password").is_none());

    let token = app.login("new@example.com", "password123").await;
    let response = app.server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_status(&response, 200);
    let me: Value = response.json();
    assert_eq!(me["email"], "new@example.com");
    assert_eq!(me["full_name"], "New Writer");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "password123",
            "full_name": "Impostor"
        }))
        .await;
    assert_error(&response, 400, "Email already registered");
}

#[tokio::test]
async fn test_register_short_password() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "email": "short@example.com",
            "password": "short",
            "full_name": "Short"
        }))
        .await;
    assert_status(&response, 400);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }))
        .await;
    assert_error(&response, 401, "Incorrect email or password");
}

#[tokio::test]
async fn test_me_rejects_bad_tokens() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/auth/me").await;
    assert_status(&response, 401);

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_status(&response, 401);
}

#[tokio::test]
async fn test_disabled_account_is_forbidden() {
    let app = TestApp::new().await;
    let (user_id, token) = app.create_user("w@example.com", "writer").await;

    let response = app
        .server
        .patch(&format!("/api/users/{}", user_id))
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "is_active": false }))
        .await;
    assert_status(&response, 200);

    let response = app.server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_status(&response, 403);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "w@example.com", "password": "password123" }))
        .await;
    assert_status(&response, 403);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.server.get("/health").await;
    assert_status(&response, 200);
    assert_eq!(response.json::<Value>(), json!({ "status": "healthy" }));
}
