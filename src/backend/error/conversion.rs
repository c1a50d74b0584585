/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`. Responses are JSON:
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * Conflicts additionally carry `current_version` so clients can decide
 * whether to re-download, and 401 responses carry `WWW-Authenticate: Bearer`.
 */

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if self.is_server_error() {
            tracing::error!("Request failed with {}: {}", status.as_u16(), self);
        } else {
            tracing::warn!("Request rejected with {}: {}", status.as_u16(), message);
        }

        let mut body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        if let BackendError::VersionConflict { current, .. } = &self {
            body["current_version"] = serde_json::json!(current);
        }

        let mut response = (status, Json(body)).into_response();
        if matches!(self, BackendError::Authentication { .. }) {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
