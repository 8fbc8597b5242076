use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// HTTP-facing error: a status plus a short title and a detail message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, message: impl Into<String>) -> Self {
        Self { status, title, message: message.into() }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Validation(_) => ApiError::new(StatusCode::BAD_REQUEST, "Validation Error", err.to_string()),
            ServiceError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Not Found", err.to_string()),
            ServiceError::DuplicateName(_) | ServiceError::DuplicateText { .. } => {
                ApiError::new(StatusCode::CONFLICT, "Conflict", err.to_string())
            }
            ServiceError::Storage(_) => {
                error!(error = %err, "storage failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.title, self.message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_status_codes() {
        let cases = [
            (ServiceError::Validation("name required".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("campaign", 9), StatusCode::NOT_FOUND),
            (ServiceError::DuplicateName("Spring".into()), StatusCode::CONFLICT),
            (ServiceError::DuplicateText { campaign_id: 1, text: "x".into() }, StatusCode::CONFLICT),
            (ServiceError::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }
}
