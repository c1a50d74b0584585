/**
 * Chat Handlers
 *
 * # Endpoints
 *
 * - `POST /api/chat`       - one complete answer
 * - `GET  /api/chat/model` - active model description
 * - `GET  /api/chat/ws?token=...` - streaming session
 *
 * Browsers cannot set headers on a websocket handshake, so the stream
 * endpoint takes the access token from the query string and authenticates
 * after the upgrade. A bad token closes with 4001, a user without `ai:use`
 * with 4003.
 */

use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{Json, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::backend::auth::permissions::{has_permission, require_permission};
use crate::backend::auth::roles::PERM_AI_USE;
use crate::backend::chat::context::load_context;
use crate::backend::chat::session::{
    close_frame, serve_connection, SessionContext, CLOSE_FORBIDDEN, CLOSE_UNAUTHORIZED,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::files::FileStore;
use crate::backend::middleware::{authenticate_token, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::{ChatRequest, ChatResponse, ModelInfo};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// Answer a prompt in one response
///
/// # Errors
///
/// * `403 Forbidden` - role lacks `ai:use`
/// * `504 Gateway Timeout` - generation exceeded the turn timeout
/// * `503 Service Unavailable` - the model failed
pub async fn chat(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChatRequest>,
) -> BackendResult<Json<ChatResponse>> {
    require_permission(&user, PERM_AI_USE)?;

    let store = FileStore::from_state(&app_state);
    let context = load_context(
        &app_state.db_pool,
        &store,
        &user,
        request.project_id,
        request.file_id,
    )
    .await;

    let generation = app_state.model.generate(&request.message, &context);
    let message = tokio::time::timeout(app_state.settings.chat_turn_timeout(), generation)
        .await
        .map_err(|_| BackendError::timeout("Response timed out"))??;

    Ok(Json(ChatResponse {
        message,
        model: app_state.model.info().model,
    }))
}

pub async fn model_info(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<ModelInfo>> {
    require_permission(&user, PERM_AI_USE)?;
    Ok(Json(app_state.model.info()))
}

pub async fn chat_websocket(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Query(params): Query<WsParams>,
) -> Response {
    ws.on_upgrade(move |socket| run_socket(socket, app_state, params.token))
}

async fn run_socket(mut socket: WebSocket, app_state: AppState, token: Option<String>) {
    let user = match token.as_deref() {
        Some(token) => authenticate_token(&app_state, token).await,
        None => Err(BackendError::authentication("Not authenticated")),
    };

    let user = match user {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Rejected chat websocket: {}", e);
            let _ = socket.send(close_frame(CLOSE_UNAUTHORIZED, "Unauthorized")).await;
            return;
        }
    };

    if !has_permission(&user, PERM_AI_USE) {
        tracing::warn!("User {} lacks ai:use, closing chat websocket", user.id);
        let _ = socket.send(close_frame(CLOSE_FORBIDDEN, "Forbidden")).await;
        return;
    }

    let ctx = SessionContext {
        user,
        pool: app_state.db_pool.clone(),
        store: FileStore::from_state(&app_state),
        model: app_state.model.clone(),
        turn_timeout: app_state.settings.chat_turn_timeout(),
    };

    let (outgoing, incoming) = socket.split();
    serve_connection(incoming, outgoing, ctx).await;
}
