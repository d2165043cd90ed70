use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid store payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store responded {status}: {body}")]
    Store { status: u16, body: String },

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid login")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Email or password is incorrect".to_string(),
            ),
            AppError::Http(e) => {
                error!("store request error: {}", e);
                (StatusCode::BAD_GATEWAY, "Store request failed".to_string())
            }
            AppError::Store { status, body } => {
                error!("store responded {}: {}", status, body);
                (StatusCode::BAD_GATEWAY, format!("Store responded {}", status))
            }
            AppError::Json(e) => {
                error!("store payload error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Store returned an unexpected payload".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
