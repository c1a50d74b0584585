//! HTTP integration tests over the full router

#[path = "../common/mod.rs"]
mod common;

mod auth_test;
mod chat_test;
mod files_test;
mod projects_test;
mod users_test;
