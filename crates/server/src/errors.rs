use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.error, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, "Invalid Input", Some(msg)),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Storage(msg) => {
                error!(error = %msg, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", Some(msg))
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid request body", Some(e.body_text()))
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid query", Some(e.body_text()))
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
