use crate::error::QueryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            tracing::debug!("Rejected request: {}", self);
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Query failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
