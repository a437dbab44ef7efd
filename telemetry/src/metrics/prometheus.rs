//! Prometheus-backed request metrics and HTTP exporter.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and the strongly-typed HTTP request metrics, and an async
//! HTTP exporter that serves `/metrics` using `hyper`.

use std::{convert::Infallible, io, net::SocketAddr, sync::Arc, time::Duration};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode,
    header::{self, HeaderValue},
    server::conn::http1,
    service::service_fn,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use super::error::MetricsError;

/// Latency buckets in seconds. Adds 0.075, 0.75 and 7.5 to the usual
/// Prometheus client defaults.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Per-request HTTP metrics.
///
/// Every completed request bumps `request_count` and adds one
/// `request_latency_seconds` observation; `error_count` only moves when a
/// handler reports a failure.
#[derive(Clone)]
pub struct HttpMetrics {
    /// Total requests, labelled by `endpoint` and `method`.
    pub request_count: IntCounterVec,
    /// Request latency in seconds, labelled by `endpoint`.
    pub request_latency_seconds: HistogramVec,
    /// Failed requests, labelled by `endpoint` and `status_code`.
    pub error_count: IntCounterVec,
}

impl HttpMetrics {
    /// Registers the request metrics into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, MetricsError> {
        let request_count = IntCounterVec::new(
            Opts::new("request_count", "Total number of requests"),
            &["endpoint", "method"],
        )?;
        registry.register(Box::new(request_count.clone()))?;

        let request_latency_seconds = HistogramVec::new(
            HistogramOpts::new("request_latency_seconds", "Request latency in seconds")
                .buckets(LATENCY_BUCKETS.to_vec()),
            &["endpoint"],
        )?;
        registry.register(Box::new(request_latency_seconds.clone()))?;

        let error_count = IntCounterVec::new(
            Opts::new("error_count", "Number of errors"),
            &["endpoint", "status_code"],
        )?;
        registry.register(Box::new(error_count.clone()))?;

        Ok(Self {
            request_count,
            request_latency_seconds,
            error_count,
        })
    }

    pub fn record_request(&self, endpoint: &str, method: &str) {
        self.request_count
            .with_label_values(&[endpoint, method])
            .inc();
    }

    /// Adds one latency sample. Negative inputs are clamped to zero.
    pub fn observe_latency(&self, endpoint: &str, seconds: f64) {
        self.request_latency_seconds
            .with_label_values(&[endpoint])
            .observe(seconds.max(0.0));
    }

    pub fn record_error(&self, endpoint: &str, status_code: u16) {
        let status_code = status_code.to_string();
        self.error_count
            .with_label_values(&[endpoint, status_code.as_str()])
            .inc();
    }
}

/// Wrapper around a Prometheus registry and the HTTP request metrics.
///
/// This is the main handle you pass around in the service. Build it once at
/// startup, wrap it in an [`Arc`], and share it between the request
/// middleware and the exporter.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub http: HttpMetrics,
}

impl MetricsRegistry {
    /// Creates a new `MetricsRegistry` with a fresh underlying `Registry`
    /// and registers the request metrics.
    ///
    /// No namespace prefix is applied, so series are exported as
    /// `request_count`, `request_latency_seconds` and `error_count`. On
    /// Linux the `process_*` series (CPU, memory, open fds) are exported
    /// alongside them.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let http = HttpMetrics::register(&registry)?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self { registry, http })
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Runs an HTTP server that exposes Prometheus metrics.
///
/// The server listens on `addr` and serves `GET /metrics` with the
/// Prometheus text exposition format. All other paths return 404.
///
/// This function is `async` and is intended to be spawned onto a Tokio
/// runtime, e.g.:
///
/// ```ignore
/// let registry = Arc::new(MetricsRegistry::new()?);
/// let addr: SocketAddr = "0.0.0.0:8000".parse()?;
/// tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
/// ```
pub async fn run_prometheus_http_server(
    metrics: Arc<MetricsRegistry>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    serve_prometheus(listener, metrics).await
}

/// Accept loop behind [`run_prometheus_http_server`], for callers that
/// already own a bound listener.
///
/// Accept errors never end the loop: they are logged and, unless they only
/// concern a single connection, followed by a short pause.
pub async fn serve_prometheus(
    listener: TcpListener,
    metrics: Arc<MetricsRegistry>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!("prometheus exporter accept error: {err}");
                if let Some(pause) = accept_backoff(&err) {
                    tokio::time::sleep(pause).await;
                }
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let metrics = metrics.clone();
                handle_request(req, metrics)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, svc).await {
                tracing::warn!(%peer, "prometheus HTTP server error: {err}");
            }
        });
    }
}

/// How long to pause after a failed `accept`. Errors tied to one peer
/// retry immediately; anything else (e.g. out of file descriptors) waits.
fn accept_backoff(err: &io::Error) -> Option<Duration> {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset => None,
        _ => Some(Duration::from_secs(1)),
    }
}

async fn handle_request<B>(
    req: Request<B>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/metrics") => {
            let mut response = Response::new(Full::new(Bytes::from(metrics.gather_text())));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(TEXT_CONTENT_TYPE),
            );
            Ok(response)
        }
        _ => {
            let mut response = Response::new(Full::new(Bytes::from_static(b"not found")));
            *response.status_mut() = StatusCode::NOT_FOUND;
            Ok(response)
        }
    }
}
