//! Project and membership integration tests

use serde_json::{json, Value};

use crate::common::{assert_error, assert_status, TestApp};

#[tokio::test]
async fn test_listing_is_scoped_to_membership() {
    let app = TestApp::new().await;
    let (writer_id, writer) = app.create_user("writer@example.com", "writer").await;
    let (_, outsider) = app.create_user("outsider@example.com", "writer").await;

    let visible = app.create_project("Visible").await;
    app.create_project("Hidden").await;
    app.add_member(visible, writer_id, "writer").await;

    let response = app.server.get("/api/projects").authorization_bearer(&app.admin_token).await;
    assert_eq!(response.json::<Vec<Value>>().len(), 2);

    let response = app.server.get("/api/projects").authorization_bearer(&writer).await;
    let projects: Vec<Value> = response.json();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Visible");

    let response = app.server.get("/api/projects").authorization_bearer(&outsider).await;
    assert!(response.json::<Vec<Value>>().is_empty());

    let response = app
        .server
        .get(&format!("/api/projects/{}", visible))
        .authorization_bearer(&outsider)
        .await;
    assert_status(&response, 403);
}

#[tokio::test]
async fn test_project_detail_and_update() {
    let app = TestApp::new().await;
    let (writer_id, writer) = app.create_user("writer@example.com", "writer").await;
    let project = app.create_project("Thesis").await;
    app.add_member(project, writer_id, "writer").await;

    let response = app
        .server
        .get(&format!("/api/projects/{}", project))
        .authorization_bearer(&writer)
        .await;
    assert_status(&response, 200);
    let detail: Value = response.json();
    assert_eq!(detail["name"], "Thesis");
    assert_eq!(detail["status"], "draft");
    assert_eq!(detail["members"].as_array().unwrap().len(), 1);
    assert_eq!(detail["file_count"], 0);

    let response = app
        .server
        .patch(&format!("/api/projects/{}", project))
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "status": "in_progress", "word_count": 1200 }))
        .await;
    assert_status(&response, 200);
    let updated: Value = response.json();
    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["word_count"], 1200);

    let response = app
        .server
        .patch(&format!("/api/projects/{}", project))
        .authorization_bearer(&writer)
        .json(&json!({ "status": "completed" }))
        .await;
    assert_status(&response, 403);

    let response = app
        .server
        .get("/api/projects/statistics")
        .authorization_bearer(&app.admin_token)
        .await;
    let stats: Value = response.json();
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["in_progress"], 1);
}

#[tokio::test]
async fn test_create_project_requires_name() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/projects")
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "name": "   " }))
        .await;
    assert_error(&response, 400, "Project name is required");
}

#[tokio::test]
async fn test_team_assignment_replaces_members() {
    let app = TestApp::new().await;
    let (a, _) = app.create_user("a@example.com", "writer").await;
    let (b, _) = app.create_user("b@example.com", "statistician").await;
    let project = app.create_project("Team").await;
    app.add_member(project, a, "writer").await;

    let response = app
        .server
        .post(&format!("/api/projects/{}/team", project))
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "members": [{ "user_id": b, "role": "statistician" }] }))
        .await;
    assert_status(&response, 200);

    let members: Vec<Value> = app
        .server
        .get(&format!("/api/projects/{}/members", project))
        .authorization_bearer(&app.admin_token)
        .await
        .json();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], b);
    assert_eq!(members[0]["role"], "statistician");

    let response = app
        .server
        .post(&format!("/api/projects/{}/team", project))
        .authorization_bearer(&app.admin_token)
        .json(&json!({ "members": [{ "user_id": 9999, "role": "writer" }] }))
        .await;
    assert_error(&response, 404, "User 9999 not found");
}

#[tokio::test]
async fn test_removed_member_loses_access() {
    let app = TestApp::new().await;
    let (writer_id, writer) = app.create_user("writer@example.com", "writer").await;
    let project = app.create_project("Revocable").await;
    app.add_member(project, writer_id, "writer").await;

    let url = format!("/api/projects/{}", project);
    assert_status(&app.server.get(&url).authorization_bearer(&writer).await, 200);

    let response = app
        .server
        .delete(&format!("/api/projects/{}/members/{}", project, writer_id))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_status(&response, 204);

    assert_status(&app.server.get(&url).authorization_bearer(&writer).await, 403);

    let response = app
        .server
        .delete(&format!("/api/projects/{}/members/{}", project, writer_id))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_error(&response, 404, "Member not found in project");
}

#[tokio::test]
async fn test_delete_project_cascades() {
    let app = TestApp::new().await;
    let (writer_id, writer) = app.create_user("writer@example.com", "writer").await;
    let project = app.create_project("Doomed").await;
    app.add_member(project, writer_id, "writer").await;
    let file = app.create_file(&writer, project, "chapter", "text").await;
    let download_url = file["download_url"].as_str().unwrap().to_string();

    let response = app
        .server
        .delete(&format!("/api/projects/{}", project))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_status(&response, 204);

    let response = app
        .server
        .get(&format!("/api/projects/{}", project))
        .authorization_bearer(&app.admin_token)
        .await;
    assert_status(&response, 404);

    let response = app.server.get(&download_url).authorization_bearer(&app.admin_token).await;
    assert_status(&response, 404);

    let response = app.server.get("/api/projects").authorization_bearer(&writer).await;
    assert!(response.json::<Vec<Value>>().is_empty());
}
