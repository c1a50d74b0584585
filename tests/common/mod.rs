//! Common test utilities and helpers
//!
//! `TestApp` runs the full router against a file-backed SQLite database and
//! a local storage root inside one temp directory, with the seeded admin
//! already logged in.

pub mod assertions;

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use manuscript_workbench::backend::server::create_app;
use manuscript_workbench::shared::{Settings, SettingsBuilder};

pub use assertions::*;

pub const ADMIN_EMAIL: &str = "admin@workbench.test";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const USER_PASSWORD: &str = "password123";

pub struct TestApp {
    pub server: TestServer,
    pub admin_token: String,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(|settings| settings, false).await
    }

    /// App whose request bodies are capped at `bytes`
    pub async fn with_upload_cap(bytes: usize) -> Self {
        Self::build(|settings| settings.max_upload_bytes(bytes), false).await
    }

    /// App served on a real socket, needed for websocket tests
    pub async fn over_http() -> Self {
        Self::build(|settings| settings, true).await
    }

    async fn build(configure: impl FnOnce(SettingsBuilder) -> SettingsBuilder, http_transport: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let builder = Settings::builder()
            .database_url(format!("sqlite://{}", dir.path().join("workbench.db").display()))
            .secret_key("integration-secret")
            .storage_path(dir.path().join("storage"))
            .password_hash_cost(4)
            .demo_token_delay_ms(0)
            .chat_turn_timeout_secs(5)
            .admin_credentials(ADMIN_EMAIL, ADMIN_PASSWORD);
        let settings = configure(builder).build().unwrap();

        let app = create_app(settings).await.unwrap();
        let server = if http_transport {
            TestServer::builder().http_transport().build(app).unwrap()
        } else {
            TestServer::new(app).unwrap()
        };

        let mut test_app = TestApp {
            server,
            admin_token: String::new(),
            _dir: dir,
        };
        test_app.admin_token = test_app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        test_app
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_status(&response, 200);
        response.json::<Value>()["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Create a user through the admin API and log them in
    pub async fn create_user(&self, email: &str, role: &str) -> (i64, String) {
        let response = self
            .server
            .post("/api/users")
            .authorization_bearer(&self.admin_token)
            .json(&json!({
                "email": email,
                "password": USER_PASSWORD,
                "full_name": email.split('@').next().unwrap(),
                "role_name": role,
            }))
            .await;
        assert_status(&response, 201);
        let id = response.json::<Value>()["id"].as_i64().unwrap();
        (id, self.login(email, USER_PASSWORD).await)
    }

    pub async fn create_project(&self, name: &str) -> i64 {
        let response = self
            .server
            .post("/api/projects")
            .authorization_bearer(&self.admin_token)
            .json(&json!({ "name": name, "description": "integration project" }))
            .await;
        assert_status(&response, 201);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    pub async fn add_member(&self, project_id: i64, user_id: i64, role: &str) {
        let response = self
            .server
            .post(&format!("/api/projects/{}/members", project_id))
            .authorization_bearer(&self.admin_token)
            .json(&json!({ "user_id": user_id, "role": role }))
            .await;
        assert_status(&response, 200);
    }

    /// Create a markdown file and return its JSON representation
    pub async fn create_file(&self, token: &str, project_id: i64, filename: &str, content: &str) -> Value {
        let response = self
            .server
            .post(&format!("/api/projects/{}/files/create", project_id))
            .authorization_bearer(token)
            .json(&json!({ "filename": filename, "content": content }))
            .await;
        assert_status(&response, 201);
        response.json()
    }
}
