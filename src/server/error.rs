use crate::utils::error::AdError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl IntoResponse for AdError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!("Request failed: {} ({})", self, self.recovery_suggestion());
        } else {
            tracing::debug!("Request rejected with {}: {}", status.as_u16(), self);
        }

        let retry_after = match &self {
            AdError::Throttled { retry_after } => Some(retry_after.as_secs().max(1)),
            _ => None,
        };

        let mut response = (status, Json(json!({ "detail": self.to_string() }))).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}
