//! Request metrics and instrumentation for the dummy app.
//!
//! This module defines Prometheus-compatible HTTP request metrics and
//! exposes a small HTTP exporter that serves `/metrics` in Prometheus text
//! format on its own port.
//!
//! Typical usage in a service:
//!
//! ```ignore
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use telemetry::metrics::{MetricsRegistry, run_prometheus_http_server};
//!
//! let registry = Arc::new(MetricsRegistry::new()?);
//! let addr: SocketAddr = "0.0.0.0:8000".parse()?;
//!
//! // Spawn the HTTP exporter in the background:
//! tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
//!
//! // Elsewhere, once per request:
//! registry.http.record_request("/", "GET");
//! registry.http.observe_latency("/", elapsed_secs);
//! ```

pub mod error;
pub mod prometheus;

pub use error::MetricsError;
pub use self::prometheus::{
    HttpMetrics, LATENCY_BUCKETS, MetricsRegistry, run_prometheus_http_server, serve_prometheus,
};
