use crate::services::storage::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

const GENERIC_MESSAGE: &str = "something went wrong";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Bad Request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Storage(e @ StorageError::Write { .. }) => {
                tracing::error!("Storage write failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": GENERIC_MESSAGE }),
                )
            }
            // Read failures echo the underlying error back to the caller.
            AppError::Storage(e @ StorageError::Read { .. }) => {
                tracing::error!("Storage read failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": GENERIC_MESSAGE, "error": e.to_string() }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
        };

        (status, Json(body)).into_response()
    }
}
