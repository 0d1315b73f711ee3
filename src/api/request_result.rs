use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::{
    crud::{PayloadError, RepositoryError},
    policy::PermissionError,
};

pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("x-pagination");

/// Errors returned by request handlers, rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("user must be authenticated")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Unprocessable {
        message: String,
        field: Option<&'static str>,
    },
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(String),
}

impl RequestError {
    pub fn forbidden() -> Self {
        Self::Forbidden("forbidden".to_string())
    }

    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{resource} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PermissionError> for RequestError {
    fn from(e: PermissionError) -> Self {
        match e {
            PermissionError::Unauthenticated => Self::Unauthenticated,
            forbidden @ PermissionError::Forbidden { .. } => Self::Forbidden(forbidden.to_string()),
        }
    }
}

impl From<RepositoryError> for RequestError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(_) => Self::Conflict(e.to_string()),
            RepositoryError::NotFound => Self::NotFound(e.to_string()),
            RepositoryError::Backend(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<PayloadError> for RequestError {
    fn from(e: PayloadError) -> Self {
        match e {
            PayloadError::Invalid { field, message } => Self::Unprocessable {
                message,
                field: Some(field),
            },
            PayloadError::Hashing(_) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::Internal(detail) => {
                error!(%detail, "Request failed");
                json!({ "error": self.to_string() })
            }
            Self::Unprocessable {
                message,
                field: Some(field),
            } => {
                let mut fields = serde_json::Map::new();
                fields.insert((*field).to_string(), Value::from(message.as_str()));
                json!({ "error": message, "fields": fields })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Page metadata sent in the `X-Pagination` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug)]
pub enum RequestSuccess {
    Ok(Value),
    Created(Value),
    Paginated(Value, Pagination),
    NoContent,
}

impl IntoResponse for RequestSuccess {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
            Self::Paginated(body, pagination) => {
                let mut response = (StatusCode::OK, Json(body)).into_response();
                if let Some(header) = serde_json::to_string(&pagination)
                    .ok()
                    .and_then(|value| HeaderValue::from_str(&value).ok())
                {
                    response.headers_mut().insert(PAGINATION_HEADER, header);
                }
                response
            }
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

pub type RequestResult = Result<RequestSuccess, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Action;

    #[test]
    fn test_permission_errors_map_to_auth_statuses() {
        let unauthenticated = RequestError::from(PermissionError::Unauthenticated);
        let forbidden = RequestError::from(PermissionError::Forbidden {
            action: Action::Create,
            entity: "UserRole(new, superadmin)".to_string(),
        });

        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            forbidden.to_string(),
            "user not allowed to create resource: UserRole(new, superadmin)"
        );
    }

    #[test]
    fn test_repository_errors() {
        assert_eq!(
            RequestError::from(RepositoryError::Conflict("email".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RequestError::from(RepositoryError::backend("disk on fire")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_payload_errors_are_unprocessable() {
        let error = RequestError::from(PayloadError::invalid("old_password", "Cannot be empty"));

        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
