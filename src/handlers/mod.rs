pub mod health;
pub mod inference;
pub mod metrics_handler;
pub mod models;
pub mod root;

use crate::config::Config;
use crate::engine::EngineClient;
use crate::request_log::RequestLogRepository;
use std::sync::Arc;
use std::time::Instant;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: EngineClient,
    pub request_log: RequestLogRepository,
}

/// Wall-clock milliseconds since `start`, unrounded
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
