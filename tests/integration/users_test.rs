//! User management integration tests

use serde_json::{json, Value};

use crate::common::{assert_error, assert_status, TestApp};

#[tokio::test]
async fn test_user_admin_lifecycle() {
    let app = TestApp::new().await;
    let (writer_id, _) = app.create_user("writer@example.com", "writer").await;
    app.create_user("stats@example.com", "statistician").await;

    let response = app.server.get("/api/users").authorization_bearer(&app.admin_token).await;
    assert_status(&response, 200);
    assert_eq!(response.json::<Vec<Value>>().len(), 3);

    let response = app
        .server
        .get("/api/users/writers")
        .authorization_bearer(&app.admin_token)
        .await;
    let writers: Vec<Value> = response.json();
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0]["email"], "writer@example.com");

    let response = app
        .server
        .get("/api/users/statisticians")
        .authorization_bearer(&app.admin_token)
        .await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = app
        .server
        .patch(&format!("/api/users/{}", writer_id))
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "full_name": "Renamed", "role_name": "statistician" }))
        .await;
    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body["full_name"], "Renamed");
    assert_eq!(body["role"]["name"], "statistician");

    let response = app
        .server
        .delete(&format!("/api/users/{}", writer_id))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_status(&response, 204);

    let response = app
        .server
        .get(&format!("/api/users/{}", writer_id))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_error(&response, 404, "User not found");
}

#[tokio::test]
async fn test_non_admin_cannot_manage_users() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("writer@example.com", "writer").await;

    let response = app.server.get("/api/users").authorization_bearer(&token).await;
    assert_error(&response, 403, "Admin access required");

    let response = app
        .server
        .post("/api/users")
        .authorization_bearer(&token)
        .json(&json!({
            "email": "x@example.com",
            "password": "password123",
            "full_name": "X"
        }))
        .await;
    assert_status(&response, 403);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::new().await;

    let me: Value = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&app.admin_token)
        .await
        .json();
    let response = app
        .server
        .delete(&format!("/api/users/{}", me["id"]))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_error(&response, 400, "Cannot delete your own account");
}
