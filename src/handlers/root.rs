use axum::{extract::State, Json};
use serde_json::json;
use std::time::Instant;

use crate::error::AppError;
use crate::handlers::{elapsed_ms, AppState};
use crate::metrics;
use crate::request_log::NewRequestLog;

pub const ENDPOINT: &str = "/";

/// Handle GET /
///
/// Trivial hello endpoint; still produces one request log entry like every
/// other handled call.
pub async fn root(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let start = Instant::now();

    let response_data = json!({ "message": "Hello World" });
    let duration_ms = elapsed_ms(start);

    state
        .request_log
        .record(
            NewRequestLog::success(ENDPOINT, json!({}), response_data.clone())
                .with_response_time(duration_ms),
        )
        .await
        .map_err(|e| AppError::Logging(e.to_string()))?;

    metrics::record_request(ENDPOINT, None, 200);

    Ok(Json(response_data))
}
