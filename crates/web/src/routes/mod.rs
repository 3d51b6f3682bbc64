use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use chess_trainer_core::Error as CoreError;

pub mod analysis;
pub mod game;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Core(CoreError::Oracle(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(CoreError::GameFinished | CoreError::NotYourMove) => {
                StatusCode::CONFLICT
            }
            ApiError::Core(e) => {
                tracing::error!("Internal error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub async fn health() -> &'static str {
    "OK"
}
