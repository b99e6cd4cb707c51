use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Network, DNS, timeout or body decoding failure talking to the movie API
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote service reported no match
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed persisted state or malformed response body
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The durable copy of the watchlist could not be written or read
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote service answered with an error other than "not found"
    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Deserialization(err.to_string())
    }
}

impl AppError {
    /// Message suitable for showing to the user in place of results.
    pub fn status_message(&self) -> String {
        match self {
            AppError::Transport(_) => "Network error".to_string(),
            AppError::NotFound(msg) | AppError::ExternalApi(msg) => msg.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Deserialization(_) => "Unexpected response from movie service".to_string(),
            AppError::Persistence(_) => "Watchlist could not be saved".to_string(),
            AppError::Internal(_) => "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Persistence(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Transport(_) | AppError::Deserialization(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
