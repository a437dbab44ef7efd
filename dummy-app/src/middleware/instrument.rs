use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use telemetry::{HttpMetrics, MetricsRegistry};
use tokio::time::Instant;

/// Start time of an in-flight request, stored in the request extensions.
#[derive(Clone, Copy, Debug)]
pub struct RequestStart(pub Instant);

/// What the post-step needs to know about the request once the handler has
/// consumed it.
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub endpoint: String,
    pub method: Method,
    pub start: Option<Instant>,
}

impl RequestInfo {
    pub fn from_request(req: &Request) -> Self {
        Self {
            endpoint: req.uri().path().to_owned(),
            method: req.method().clone(),
            start: req.extensions().get::<RequestStart>().map(|s| s.0),
        }
    }
}

/// Pre-step: stamps the request with its start time.
pub fn before_request(req: &mut Request) {
    req.extensions_mut().insert(RequestStart(Instant::now()));
    tracing::debug!(method = %req.method(), path = %req.uri().path(), "request started");
}

/// Post-step: counts the request and observes its latency, then hands the
/// response back untouched.
///
/// A missing start time skips the latency observation; the request is
/// still counted.
pub fn after_request(metrics: &HttpMetrics, info: RequestInfo, response: Response) -> Response {
    let RequestInfo {
        endpoint,
        method,
        start,
    } = info;

    metrics.record_request(&endpoint, method.as_str());

    let status = response.status().as_u16();
    match start {
        Some(start) => {
            let latency = start.elapsed().as_secs_f64();
            metrics.observe_latency(&endpoint, latency);
            tracing::debug!(
                %method,
                path = %endpoint,
                status,
                latency = format_args!("{latency:.4}s"),
                "request completed"
            );
        }
        None => {
            tracing::warn!(
                %method,
                path = %endpoint,
                status,
                "request completed without a start time; latency not recorded"
            );
        }
    }

    response
}

/// Middleware wrapping every route: pre-step, handler, post-step.
///
/// Installed with `axum::middleware::from_fn_with_state` so the registry is
/// passed in explicitly rather than reached through a global.
pub async fn instrument(
    State(metrics): State<Arc<MetricsRegistry>>,
    mut req: Request,
    next: Next,
) -> Response {
    before_request(&mut req);
    let info = RequestInfo::from_request(&req);
    let response = next.run(req).await;
    after_request(&metrics.http, info, response)
}
