//! File versioning integration tests

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use crate::common::{assert_error, assert_status, TestApp};

struct FilesFixture {
    app: TestApp,
    project: i64,
    writer: String,
    statistician: String,
    outsider: String,
}

async fn fixture() -> FilesFixture {
    let app = TestApp::new().await;
    let (writer_id, writer) = app.create_user("writer@example.com", "writer").await;
    let (stat_id, statistician) = app.create_user("stats@example.com", "statistician").await;
    let (_, outsider) = app.create_user("outsider@example.com", "writer").await;
    let project = app.create_project("Manuscript").await;
    app.add_member(project, writer_id, "writer").await;
    app.add_member(project, stat_id, "statistician").await;

    FilesFixture {
        app,
        project,
        writer,
        statistician,
        outsider,
    }
}

fn file_form(name: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(name)
            .mime_type("text/markdown"),
    )
}

fn update_form(version: &str, content: &[u8]) -> MultipartForm {
    file_form("ignored.md", content).add_text("version", version)
}

#[tokio::test]
async fn test_create_and_read_back() {
    let f = fixture().await;
    let text = "# Chapter 1\n\nIt was a dark and stormy night. Ünïcödé.";

    let file = f.app.create_file(&f.writer, f.project, "chapter1", text).await;
    assert_eq!(file["filename"], "chapter1.md");
    assert_eq!(file["version"], 0);
    assert_eq!(file["size"], text.len());
    assert_eq!(file["uploader_name"], "writer");
    let id = file["id"].as_i64().unwrap();

    let response = f
        .app
        .server
        .get(&format!("/api/projects/{}/files/{}/content", f.project, id))
        .authorization_bearer(&f.statistician)
        .await;
    assert_status(&response, 200);
    let content: Value = response.json();
    assert_eq!(content["content"], text);
    assert_eq!(content["filename"], "chapter1.md");

    let response = f
        .app
        .server
        .get(&format!("/api/projects/{}/files/{}/download", f.project, id))
        .authorization_bearer(&f.writer)
        .await;
    assert_status(&response, 200);
    assert_eq!(response.as_bytes().as_ref(), text.as_bytes());
    let disposition = response.header("content-disposition");
    assert_eq!(disposition, "attachment; filename=\"chapter1.md\"");

    let url = file["download_url"].as_str().unwrap();
    let response = f.app.server.get(url).authorization_bearer(&f.statistician).await;
    assert_status(&response, 200);
    assert_eq!(response.text(), text);
}

#[tokio::test]
async fn test_upload_and_list() {
    let f = fixture().await;

    let response = f
        .app
        .server
        .post(&format!("/api/projects/{}/files", f.project))
        .authorization_bearer(&f.writer)
        .multipart(file_form("../../notes.md", b"draft notes"))
        .await;
    assert_status(&response, 201);
    let uploaded: Value = response.json();
    assert_eq!(uploaded["filename"], "notes.md");
    assert_eq!(uploaded["content_type"], "text/markdown");

    f.app.create_file(&f.writer, f.project, "second", "more").await;

    let response = f
        .app
        .server
        .get(&format!("/api/projects/{}/files", f.project))
        .authorization_bearer(&f.statistician)
        .await;
    let list: Value = response.json();
    assert_eq!(list["total"], 2);
    assert_eq!(list["files"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_upload_rejected() {
    let f = fixture().await;

    let response = f
        .app
        .server
        .post(&format!("/api/projects/{}/files", f.project))
        .authorization_bearer(&f.writer)
        .multipart(file_form("empty.md", b""))
        .await;
    assert_error(&response, 400, "Uploaded file is empty");
}

#[tokio::test]
async fn test_versioned_update_and_conflict() {
    let f = fixture().await;
    let file = f.app.create_file(&f.writer, f.project, "draft", "v0").await;
    let url = format!("/api/projects/{}/files/{}", f.project, file["id"]);

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.writer)
        .multipart(update_form("2", b"version two"))
        .await;
    assert_status(&response, 200);
    let updated: Value = response.json();
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["size"], 11);

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.writer)
        .multipart(update_form("0", b"stale edit"))
        .await;
    assert_error(&response, 409, "Server version is 2");
    assert_eq!(response.json::<Value>()["current_version"], 2);

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.writer)
        .multipart(update_form("2", b"same version"))
        .await;
    assert_status(&response, 409);

    let content: Value = f
        .app
        .server
        .get(&format!("{}/content", url))
        .authorization_bearer(&f.writer)
        .await
        .json();
    assert_eq!(content["content"], "version two");
}

#[tokio::test]
async fn test_update_form_validation() {
    let f = fixture().await;
    let file = f.app.create_file(&f.writer, f.project, "draft", "v0").await;
    let url = format!("/api/projects/{}/files/{}", f.project, file["id"]);

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.writer)
        .multipart(file_form("x.md", b"no version"))
        .await;
    assert_error(&response, 400, "Version is required");

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.writer)
        .multipart(update_form("two", b"bad version"))
        .await;
    assert_error(&response, 400, "Version must be an integer");

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.writer)
        .multipart(MultipartForm::new().add_text("version", "3"))
        .await;
    assert_error(&response, 400, "File is required");
}

#[tokio::test]
async fn test_write_requires_writer_membership() {
    let f = fixture().await;
    let file = f.app.create_file(&f.writer, f.project, "draft", "v0").await;
    let url = format!("/api/projects/{}/files/{}", f.project, file["id"]);

    let response = f
        .app
        .server
        .put(&url)
        .authorization_bearer(&f.statistician)
        .multipart(update_form("1", b"statistician edit"))
        .await;
    assert_status(&response, 403);

    let response = f
        .app
        .server
        .post(&format!("/api/projects/{}/files/create", f.project))
        .authorization_bearer(&f.statistician)
        .json(&json!({ "filename": "stats", "content": "" }))
        .await;
    assert_status(&response, 403);

    let response = f.app.server.get(&url).authorization_bearer(&f.outsider).await;
    assert_status(&response, 403);

    let url = file["download_url"].as_str().unwrap();
    let response = f.app.server.get(url).authorization_bearer(&f.outsider).await;
    assert_status(&response, 403);
}

#[tokio::test]
async fn test_file_from_other_project_is_not_found() {
    let f = fixture().await;
    let file = f.app.create_file(&f.writer, f.project, "draft", "v0").await;
    let other = f.app.create_project("Other").await;

    let response = f
        .app
        .server
        .get(&format!("/api/projects/{}/files/{}", other, file["id"]))
        .authorization_bearer(&f.app.admin_token)
        .await;
    assert_error(&response, 404, "File not found");
}

#[tokio::test]
async fn test_delete_file() {
    let f = fixture().await;
    let file = f.app.create_file(&f.writer, f.project, "draft", "v0").await;
    let url = format!("/api/projects/{}/files/{}", f.project, file["id"]);

    let response = f.app.server.delete(&url).authorization_bearer(&f.writer).await;
    assert_status(&response, 204);

    let response = f.app.server.get(&url).authorization_bearer(&f.writer).await;
    assert_status(&response, 404);

    let response = f.app.server.delete(&url).authorization_bearer(&f.writer).await;
    assert_status(&response, 404);
}

#[tokio::test]
async fn test_upload_over_cap_is_rejected() {
    let app = TestApp::with_upload_cap(4096).await;
    let (writer_id, writer) = app.create_user("writer@example.com", "writer").await;
    let project = app.create_project("Capped").await;
    app.add_member(project, writer_id, "writer").await;
    let url = format!("/api/projects/{}/files", project);

    let response = app
        .server
        .post(&url)
        .authorization_bearer(&writer)
        .multipart(file_form("small.md", &[b'a'; 512]))
        .await;
    assert_status(&response, 201);

    let response = app
        .server
        .post(&url)
        .authorization_bearer(&writer)
        .multipart(file_form("large.md", &[b'a'; 16 * 1024]))
        .await;
    assert_status(&response, 413);

    let list: Value = app
        .server
        .get(&url)
        .authorization_bearer(&writer)
        .await
        .json();
    assert_eq!(list["total"], 1);
}
