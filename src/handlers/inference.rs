use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::engine::EngineError;
use crate::error::AppError;
use crate::handlers::{elapsed_ms, AppState};
use crate::metrics;
use crate::request_log::NewRequestLog;

pub const ENDPOINT: &str = "/api/llm/inference";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// The prompt to send to the model
    pub prompt: String,
    /// The engine model to use for inference
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub model: String,
    pub response: String,
    /// Whitespace-delimited word count of the response, not true
    /// tokenization
    pub tokens: usize,
    pub token_per_second: f64,
}

/// Handle POST /api/llm/inference
///
/// Single-shot generation. Engine-classified failures (e.g. unknown model)
/// come back as 400, everything else as 500; both paths are logged before
/// the handler returns.
pub async fn inference(
    State(state): State<AppState>,
    Json(request): Json<InferenceRequest>,
) -> Result<Json<InferenceResponse>, AppError> {
    let start = Instant::now();

    let request_data =
        serde_json::to_value(&request).map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(model = %request.model, "Handling inference request");

    match state.engine.generate(&request.model, &request.prompt).await {
        Ok(generated) => {
            let elapsed = start.elapsed();
            let tokens = count_tokens(&generated);
            let token_per_second = tokens_per_second(tokens, elapsed);

            let response = InferenceResponse {
                model: request.model.clone(),
                response: generated,
                tokens,
                token_per_second,
            };
            let response_data = serde_json::to_value(&response)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let duration_ms = elapsed_ms(start);

            state
                .request_log
                .record(
                    NewRequestLog::success(ENDPOINT, request_data, response_data)
                        .with_model(&request.model)
                        .with_response_time(duration_ms),
                )
                .await
                .map_err(|e| AppError::Logging(e.to_string()))?;

            metrics::record_request(ENDPOINT, Some(&request.model), 200);
            metrics::record_duration(ENDPOINT, elapsed);

            tracing::info!(
                model = %request.model,
                tokens = tokens,
                duration_ms = duration_ms,
                "Inference completed"
            );

            Ok(Json(response))
        }
        Err(err) => {
            let duration_ms = elapsed_ms(start);

            let (status_code, error_msg) = match &err {
                EngineError::Classified(msg) => (400, format!("Ollama error: {}", msg)),
                EngineError::Unclassified(msg) => {
                    (500, format!("Internal server error: {}", msg))
                }
            };

            tracing::warn!(
                model = %request.model,
                status_code = status_code,
                error = %error_msg,
                "Inference failed"
            );

            state
                .request_log
                .record(
                    NewRequestLog::failure(ENDPOINT, request_data, status_code, &error_msg)
                        .with_model(&request.model)
                        .with_response_time(duration_ms),
                )
                .await
                .map_err(|e| AppError::Logging(e.to_string()))?;

            metrics::record_request(ENDPOINT, Some(&request.model), status_code);

            let error = match err {
                EngineError::Classified(_) => AppError::Engine(error_msg),
                EngineError::Unclassified(_) => AppError::Internal(error_msg),
            };
            metrics::record_error(ENDPOINT, error.error_type());
            Err(error)
        }
    }
}

/// Simple token count approximation: whitespace-separated words
pub(crate) fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Tokens per second, rounded to 6 decimal places; 0 when no time elapsed
pub(crate) fn tokens_per_second(tokens: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        (tokens as f64 / seconds * 1e6).round() / 1e6
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens("Hello there friend"), 3);
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("   "), 0);
        assert_eq!(count_tokens("one\ntwo\tthree  four"), 4);
    }

    #[test]
    fn test_tokens_per_second_zero_elapsed() {
        assert_eq!(tokens_per_second(8, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_tokens_per_second_rounds_to_six_decimals() {
        // 1 token / 3 s = 0.333333...
        assert_eq!(tokens_per_second(1, Duration::from_secs(3)), 0.333333);
        // 8 tokens / 2 s = 4.0 exactly
        assert_eq!(tokens_per_second(8, Duration::from_secs(2)), 4.0);
    }

    #[test]
    fn test_inference_request_round_trips_through_json() {
        let request = InferenceRequest {
            prompt: "Hello, World!".to_string(),
            model: "llama2".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"prompt": "Hello, World!", "model": "llama2"})
        );

        let parsed: InferenceRequest = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.model, "llama2");
    }
}
