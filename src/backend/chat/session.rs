/**
 * Chat Streaming Session
 *
 * One websocket connection, already authenticated. Each inbound text frame
 * is a `ChatRequest`; the reply is a `start` event, the model's fragments
 * as `token` events, then an `end` event carrying the concatenation.
 *
 * Turns are strictly sequential: the next frame is read only after the
 * previous turn's `end` was sent. A turn that fails or exceeds the turn
 * timeout sends one `error` event and closes the socket with code 1011.
 * A client that goes away mid-turn drops the token stream, which stops the
 * producer.
 *
 * `serve_connection` is generic over the frame stream and sink so it can be
 * driven without a real socket.
 */

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{close_code, CloseFrame, Message, Utf8Bytes};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use sqlx::SqlitePool;
use tokio::time::{timeout_at, Instant};

use crate::backend::auth::users::User;
use crate::backend::chat::context::load_context;
use crate::backend::files::FileStore;
use crate::backend::llm::ModelProvider;
use crate::shared::{ChatEvent, ChatRequest};

/// Application close code for a rejected token
pub const CLOSE_UNAUTHORIZED: u16 = 4001;

/// Application close code for an account without chat permission
pub const CLOSE_FORBIDDEN: u16 = 4003;

/// Everything a session needs besides the socket
#[derive(Clone)]
pub struct SessionContext {
    pub user: User,
    pub pool: SqlitePool,
    pub store: FileStore,
    pub model: Arc<dyn ModelProvider>,
    pub turn_timeout: Duration,
}

/// Why a turn did not finish
#[derive(Debug)]
enum TurnError {
    /// The client stopped accepting frames
    Disconnected,
    /// Generation failed; the client gets an `error` event
    Failed(String),
}

/// Close frame with an application code and reason
pub fn close_frame(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Utf8Bytes::from_static(reason),
    }))
}

async fn emit<K>(outgoing: &mut K, event: ChatEvent) -> Result<(), TurnError>
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    let json = serde_json::to_string(&event)
        .map_err(|e| TurnError::Failed(format!("failed to encode event: {}", e)))?;
    outgoing.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::debug!("Chat client stopped receiving: {}", e);
        TurnError::Disconnected
    })
}

/// Run the frame loop until the client closes or a turn fails
pub async fn serve_connection<S, E, K>(mut incoming: S, mut outgoing: K, ctx: SessionContext)
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    tracing::info!("Chat session opened for user {}", ctx.user.id);

    while let Some(frame) = incoming.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("Chat connection read error: {}", e);
                break;
            }
        };

        let request: ChatRequest = match serde_json::from_str(text.as_str()) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Malformed chat frame from user {}: {}", ctx.user.id, e);
                let _ = emit(&mut outgoing, ChatEvent::error("Invalid message format")).await;
                let _ = outgoing
                    .send(close_frame(close_code::INVALID, "Invalid message format"))
                    .await;
                break;
            }
        };

        match run_turn(&ctx, &request, &mut outgoing).await {
            Ok(()) => {}
            Err(TurnError::Disconnected) => break,
            Err(TurnError::Failed(message)) => {
                tracing::error!("Chat turn failed for user {}: {}", ctx.user.id, message);
                let _ = emit(&mut outgoing, ChatEvent::error(message)).await;
                let _ = outgoing.send(close_frame(close_code::ERROR, "Generation failed")).await;
                break;
            }
        }
    }

    tracing::info!("Chat session closed for user {}", ctx.user.id);
}

/// One request → `start`, `token`*, `end`
async fn run_turn<K>(ctx: &SessionContext, request: &ChatRequest, outgoing: &mut K) -> Result<(), TurnError>
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    let deadline = Instant::now() + ctx.turn_timeout;

    let context = load_context(
        &ctx.pool,
        &ctx.store,
        &ctx.user,
        request.project_id,
        request.file_id,
    )
    .await;

    emit(outgoing, ChatEvent::start(ctx.model.info().model)).await?;

    let mut tokens = ctx.model.stream(&request.message, &context);
    let mut full_response = String::new();

    loop {
        match timeout_at(deadline, tokens.next()).await {
            Err(_) => return Err(TurnError::Failed("Response timed out".to_string())),
            Ok(None) => break,
            Ok(Some(Err(e))) => return Err(TurnError::Failed(e.to_string())),
            Ok(Some(Ok(fragment))) => {
                tracing::debug!("Chat token: {:?}", fragment);
                full_response.push_str(&fragment);
                emit(outgoing, ChatEvent::token(fragment)).await?;
            }
        }
    }

    emit(outgoing, ChatEvent::end(full_response)).await
}
