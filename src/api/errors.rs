//! API error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::types::ErrorResponse;
use crate::ordering::OrderingError;
use crate::util::IdentifierError;
use crate::workspace::WorkspaceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{kind}: {message}")]
    Internal { kind: String, message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(e: WorkspaceError) -> Self {
        match e {
            WorkspaceError::WorkspaceNotFound(_)
            | WorkspaceError::RunNotFound(_)
            | WorkspaceError::StepNotFound(_) => ApiError::NotFound(e.to_string()),
            WorkspaceError::Unsupported(_) | WorkspaceError::InvalidIdentifier(_) => {
                ApiError::BadRequest(e.to_string())
            }
            WorkspaceError::Io(_) | WorkspaceError::Corrupt(_) => ApiError::Internal {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        }
    }
}

impl From<OrderingError> for ApiError {
    fn from(e: OrderingError) -> Self {
        ApiError::Internal {
            kind: "CycleOrMissingDependency".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<IdentifierError> for ApiError {
    fn from(e: IdentifierError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::NotFound(message) | ApiError::BadRequest(message) => ErrorResponse {
                error: message,
                kind: None,
            },
            ApiError::Internal { kind, message } => {
                error!(kind = %kind, "Workspace request failed: {}", message);
                ErrorResponse {
                    error: message,
                    kind: Some(kind),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err: ApiError = WorkspaceError::RunNotFound("r1".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("r1"));
    }

    #[test]
    fn test_unsupported_is_client_error() {
        let err: ApiError =
            WorkspaceError::Unsupported("cannot sort steps by start_time".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "cannot sort steps by start_time");
    }

    #[test]
    fn test_corrupt_is_internal_with_kind() {
        let err: ApiError = WorkspaceError::Corrupt("truncated".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            ApiError::Internal { kind, message } => {
                assert_eq!(kind, "CorruptWorkspace");
                assert!(message.contains("truncated"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cycle_is_internal() {
        let err: ApiError = OrderingError::CycleOrMissingDependency {
            pending: vec!["a".into()],
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("CycleOrMissingDependency: "));
    }

    #[test]
    fn test_bad_identifier_is_client_error() {
        let err: ApiError = IdentifierError::InvalidBase64("%%".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = ApiError::NotFound("Run 'x' not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Run 'x' not found");
        assert!(parsed.kind.is_none());
    }
}
