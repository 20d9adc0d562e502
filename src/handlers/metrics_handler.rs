use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Handle GET /metrics
/// Renders the Prometheus exposition text; not written to the request log
pub async fn metrics(State(handle): State<Arc<PrometheusHandle>>) -> String {
    handle.render()
}
