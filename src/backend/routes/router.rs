/**
 * Router Configuration
 *
 * Assembles every route into one router:
 *
 * 1. `/health`
 * 2. `/api` public routes (login, register) and the chat websocket
 * 3. `/api` protected routes behind `auth_middleware`
 * 4. JSON 404 fallback
 *
 * Layers, outermost first: request tracing, CORS, body size limit.
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::{protected_api_routes, public_api_routes};
use crate::backend::routes::chat_routes::{chat_socket_routes, protected_chat_routes};
use crate::backend::server::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn not_found() -> impl IntoResponse {
    BackendError::not_found("Not found")
}

/// CORS for the configured origins; unparsable origins are skipped
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = protected_api_routes()
        .merge(protected_chat_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let api = public_api_routes()
        .merge(chat_socket_routes())
        .merge(protected);

    let settings = app_state.settings.clone();

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.max_upload_bytes))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn status_of(uri: &str) -> StatusCode {
        let (_dir, state) = test_state().await;
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        assert_eq!(status_of("/api/auth/me").await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("/api/projects").await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("/api/chat/model").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        assert_eq!(status_of("/nowhere").await, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_skips_invalid_origins() {
        // Construction must not panic on a header-invalid origin.
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
