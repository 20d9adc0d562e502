use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    describe_counter!("jagad_requests_total", "Total number of handled API requests");
    describe_histogram!(
        "jagad_request_duration_seconds",
        "Request duration in seconds"
    );
    describe_counter!("jagad_errors_total", "Total number of failed requests");

    handle
}

/// Record a handled request
pub fn record_request(endpoint: &str, model: Option<&str>, status_code: u16) {
    counter!(
        "jagad_requests_total",
        "endpoint" => endpoint.to_string(),
        "model" => model.unwrap_or("none").to_string(),
        "status" => status_code.to_string(),
    )
    .increment(1);
}

/// Record request duration
pub fn record_duration(endpoint: &str, duration: Duration) {
    histogram!(
        "jagad_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a failed request
pub fn record_error(endpoint: &str, error_type: &str) {
    counter!(
        "jagad_errors_total",
        "endpoint" => endpoint.to_string(),
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics_without_recorder() {
        // Without an installed recorder these are no-ops; just verify the
        // calls don't panic.
        record_request("/api/llm/inference", Some("llama2"), 200);
        record_duration("/api/llm/inference", Duration::from_secs(2));
        record_error("/api/llm/inference", "engine_error");
    }
}
