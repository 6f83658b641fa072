//! Metrics implementation using Prometheus.

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use prompt_forge_core::{Error, Result};

const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Latency buckets in seconds. Enhancements wait on a remote model, so the
/// upper buckets reach well past the usual web defaults.
const REQUEST_DURATION_BUCKETS: &[f64] = &[0.005, 0.05, 0.25, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

fn builder() -> Result<PrometheusBuilder> {
    PrometheusBuilder::new()
        .add_global_label("service", "prompt-forge")
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            REQUEST_DURATION_BUCKETS,
        )
        .map_err(|e| Error::internal(format!("Invalid metric buckets: {}", e)))
}

/// Install the process-wide Prometheus recorder.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = builder()?
        .install_recorder()
        .map_err(|e| Error::internal(format!("Failed to install Prometheus recorder: {}", e)))?;

    tracing::info!(buckets = REQUEST_DURATION_BUCKETS.len(), "Prometheus recorder installed");
    Ok(handle)
}

/// Count one routed request and record its latency under the matched route.
pub fn track_request(method: &str, route: &str, status: u16, elapsed_secs: f64) {
    let method = method.to_string();
    let route = route.to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(REQUEST_DURATION, "method" => method, "path" => route).record(elapsed_secs);
}

/// Count one completed enhancement by output format and whether the model
/// answer had to be replaced.
pub fn track_enhancement(format: &str, fallback: bool) {
    metrics::counter!(
        "prompt_enhancements_total",
        "format" => format.to_string(),
        "fallback" => fallback.to_string()
    )
    .increment(1);
}

/// Count one failed upstream call by error class.
pub fn track_upstream_failure(kind: &'static str) {
    metrics::counter!("upstream_failures_total", "kind" => kind).increment(1);
}
