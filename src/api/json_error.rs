use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;
use validator::ValidationErrors;

/// Rejection for [`super::validated_json::ValidatedJson`]. Both cases are a
/// 400 with the same `{"error": ...}` body as other request errors.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] JsonRejection),
    #[error("payload validation failed")]
    ValidationError(ValidationErrors),
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        debug!(error = %self, "Rejected request payload");

        let body = match &self {
            Self::InvalidJson(rejection) => json!({ "error": rejection.body_text() }),
            Self::ValidationError(errors) => json!({
                "error": self.to_string(),
                "fields": errors,
            }),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
