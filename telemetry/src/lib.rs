//! Telemetry library crate.
//!
//! This crate provides the metrics side of the dummy app:
//!
//! - strongly-typed Prometheus request metrics (`metrics::HttpMetrics`),
//! - the owning registry that binaries share across tasks
//!   (`metrics::MetricsRegistry`),
//! - a standalone `/metrics` exporter served on its own port,
//! - and the exporter configuration (`config`).
//!
//! The HTTP service itself lives in the `dummy-app` binary, which builds one
//! registry at startup and hands it to both its request middleware and the
//! exporter.

pub mod config;
pub mod metrics;

pub use config::{DEFAULT_METRICS_PORT, MetricsConfig};

pub use metrics::{
    HttpMetrics, LATENCY_BUCKETS, MetricsError, MetricsRegistry, run_prometheus_http_server,
    serve_prometheus,
};
