/**
 * Chat Routes
 *
 * - `POST /chat` - complete answer
 * - `GET /chat/model` - model description
 * - `GET /chat/ws` - streaming websocket, token in the query string
 *
 * The websocket route authenticates itself after the upgrade, so it is
 * returned separately from the header-authenticated routes.
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::chat::{chat, chat_websocket, model_info};
use crate::backend::server::state::AppState;

/// Chat routes behind the bearer-token middleware
pub fn protected_chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/model", get(model_info))
}

/// The streaming endpoint
pub fn chat_socket_routes() -> Router<AppState> {
    Router::new().route("/chat/ws", get(chat_websocket))
}
