use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application error types at the handler boundary
///
/// Every failure is written to the request log before one of these is
/// returned to the caller.
#[derive(Debug)]
pub enum AppError {
    /// Engine-classified fault (e.g. unknown model name)
    Engine(String),
    /// Any other failure
    Internal(String),
    /// The request log write itself failed
    Logging(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(msg) => write!(f, "{}", msg),
            Self::Internal(msg) => write!(f, "{}", msg),
            Self::Logging(msg) => write!(f, "Failed to record request log: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Stable error kind label, used for metrics
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Engine(_) => "engine_error",
            Self::Internal(_) => "internal_error",
            Self::Logging(_) => "logging_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Engine(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Logging(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::Engine("Ollama error: model 'gpt-5' not found".to_string());
        assert_eq!(error.to_string(), "Ollama error: model 'gpt-5' not found");
    }

    #[test]
    fn test_error_type() {
        assert_eq!(AppError::Engine("x".to_string()).error_type(), "engine_error");
        assert_eq!(AppError::Internal("x".to_string()).error_type(), "internal_error");
        assert_eq!(AppError::Logging("x".to_string()).error_type(), "logging_error");
    }

    #[tokio::test]
    async fn test_engine_error_maps_to_400() {
        let error = AppError::Engine("Ollama error: bad model".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_and_logging_errors_map_to_500() {
        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Logging("disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
