/**
 * API Routes
 *
 * Resource endpoints mounted under `/api`.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /auth/login` - public
 * - `POST /auth/register` - public
 * - `GET  /auth/me`
 *
 * ## Users (admin)
 * - `GET/POST /users`, `GET /users/writers`, `GET /users/statisticians`
 * - `GET/PATCH/DELETE /users/{id}`
 *
 * ## Projects
 * - `GET/POST /projects`, `GET /projects/statistics`
 * - `GET/PATCH/DELETE /projects/{id}`, `POST /projects/{id}/team`
 * - `GET/POST /projects/{id}/members`, `DELETE /projects/{id}/members/{user_id}`
 *
 * ## Files
 * - `GET/POST /projects/{id}/files`, `POST /projects/{id}/files/create`
 * - `GET/PUT/DELETE /projects/{id}/files/{file_id}`
 * - `GET /projects/{id}/files/{file_id}/download`, `.../content`
 * - `GET /storage/{*path}`
 */

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::backend::auth::{get_me, login, register};
use crate::backend::files::handlers as files;
use crate::backend::projects::handlers as projects;
use crate::backend::server::state::AppState;
use crate::backend::users::handlers as users;

/// Routes reachable without a token
pub fn public_api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Routes that expect an authenticated user in the request extensions
pub fn protected_api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/writers", get(users::list_writers))
        .route("/users/statisticians", get(users::list_statisticians))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Projects
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/projects/statistics", get(projects::project_statistics))
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/{id}/team", post(projects::assign_team))
        .route(
            "/projects/{id}/members",
            get(projects::list_members).post(projects::add_member),
        )
        .route(
            "/projects/{id}/members/{user_id}",
            delete(projects::remove_member),
        )
        // Files
        .route(
            "/projects/{id}/files",
            get(files::list_files).post(files::upload_file),
        )
        .route("/projects/{id}/files/create", post(files::create_file))
        .route(
            "/projects/{id}/files/{file_id}",
            get(files::get_file)
                .put(files::update_file)
                .delete(files::delete_file),
        )
        .route(
            "/projects/{id}/files/{file_id}/download",
            get(files::download_file),
        )
        .route(
            "/projects/{id}/files/{file_id}/content",
            get(files::get_file_content),
        )
        .route("/storage/{*path}", get(files::serve_storage))
}
