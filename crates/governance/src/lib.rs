#![deny(unused)]
//! Observability for Prompt Forge.
//!
//! This crate provides:
//! - Structured logging setup
//! - Prometheus metrics helpers

pub mod metrics;
pub mod tracing_layer;

pub use metrics::{
    setup_metrics_recorder, track_enhancement, track_request, track_upstream_failure,
};
pub use metrics_exporter_prometheus::PrometheusHandle;
pub use tracing_layer::{configure_tracing, DEFAULT_FILTER};
