use std::fmt;
use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use telemetry::MetricsError;

/// Plain-text body of every simulated failure.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Errors a route handler can answer with.
///
/// These are ordinary responses: the instrumentation middleware still sees
/// them and records count and latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Deliberately injected failure used to exercise error monitoring.
    SimulatedFailure,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SimulatedFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), INTERNAL_ERROR_BODY).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::SimulatedFailure => write!(f, "simulated internal failure"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Fatal errors raised while starting or running the service.
#[derive(Debug)]
pub enum ServerError {
    /// The metrics registry could not be built.
    Metrics(MetricsError),
    /// The business listener could not be bound.
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    /// The metrics exporter listener could not be bound.
    MetricsBind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    /// The business server stopped with an I/O error.
    Serve(std::io::Error),
}

impl From<MetricsError> for ServerError {
    fn from(e: MetricsError) -> Self {
        ServerError::Metrics(e)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Metrics(e) => write!(f, "failed to initialise metrics registry: {e}"),
            ServerError::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            ServerError::MetricsBind { addr, source } => {
                write!(f, "failed to bind metrics exporter on {addr}: {source}")
            }
            ServerError::Serve(e) => write!(f, "HTTP server error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Metrics(e) => Some(e),
            ServerError::Bind { source, .. } => Some(source),
            ServerError::MetricsBind { source, .. } => Some(source),
            ServerError::Serve(e) => Some(e),
        }
    }
}
