use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use crate::error::AppError;
use crate::handlers::{elapsed_ms, AppState};
use crate::metrics;
use crate::request_log::NewRequestLog;

pub const ENDPOINT: &str = "/api/llm/model";

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Handle GET /api/llm/model
///
/// Lists the models installed on the engine. Any failure here, classified
/// or not, is a server error: the caller asked for nothing the engine
/// could refuse.
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, AppError> {
    let start = Instant::now();

    match state.engine.list_models().await {
        Ok(models) => {
            let response = ModelsResponse { models };
            let response_data = serde_json::to_value(&response)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let duration_ms = elapsed_ms(start);

            state
                .request_log
                .record(
                    NewRequestLog::success(ENDPOINT, json!({}), response_data)
                        .with_response_time(duration_ms),
                )
                .await
                .map_err(|e| AppError::Logging(e.to_string()))?;

            metrics::record_request(ENDPOINT, None, 200);
            metrics::record_duration(ENDPOINT, start.elapsed());

            tracing::info!(
                models = response.models.len(),
                duration_ms = duration_ms,
                "Listed engine models"
            );

            Ok(Json(response))
        }
        Err(err) => {
            let error_msg = format!("Failed to list models: {}", err);
            let duration_ms = elapsed_ms(start);

            tracing::warn!(error = %error_msg, "Engine model listing failed");

            state
                .request_log
                .record(
                    NewRequestLog::failure(ENDPOINT, json!({}), 500, &error_msg)
                        .with_response_time(duration_ms),
                )
                .await
                .map_err(|e| AppError::Logging(e.to_string()))?;

            metrics::record_request(ENDPOINT, None, 500);

            let error = AppError::Internal(error_msg);
            metrics::record_error(ENDPOINT, error.error_type());
            Err(error)
        }
    }
}
