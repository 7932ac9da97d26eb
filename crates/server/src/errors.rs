use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mindscribe::{RecommendError, StoreError};
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the storage providers.
    Store(StoreError),
    /// Errors originating from the recommendation engine.
    Recommend(RecommendError),
    /// The request was malformed.
    BadRequest(String),
    /// The requested resource does not exist.
    NotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        AppError::Recommend(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

fn server_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server Error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Store(err) => match err {
                StoreError::Validation(msg) => {
                    warn!("Rejected invalid input: {msg}");
                    (StatusCode::BAD_REQUEST, msg)
                }
                StoreError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
                other => {
                    error!("StoreError: {:?}", other);
                    server_error()
                }
            },
            AppError::Recommend(err) => {
                error!("RecommendError: {:?}", err);
                server_error()
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                server_error()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
