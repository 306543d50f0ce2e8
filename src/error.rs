use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("upstream call failed: {0}")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Store(err) => match err {
                StoreError::NotFound(resource) => {
                    (StatusCode::NOT_FOUND, format!("{resource} not found"))
                }
                StoreError::Conflict(resource) => {
                    (StatusCode::CONFLICT, format!("conflict on {resource}"))
                }
                StoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
                StoreError::Serialization(_)
                | StoreError::Transport(_)
                | StoreError::Unexpected(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store operation failed".to_string(),
                ),
            },
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (
                AppError::from(StoreError::NotFound("/dbs/d/colls/c/docs/1".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(StoreError::Conflict("/dbs/d".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(StoreError::Unexpected(503)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::bad_request("no id"), StatusCode::BAD_REQUEST),
            (AppError::not_found("item"), StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
