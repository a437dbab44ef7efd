//! Shared application state.

use std::sync::Arc;

use telemetry::MetricsRegistry;

use crate::outcome::OutcomeGenerator;

/// Shared state held by the request handlers.
///
/// This is wrapped in an [`Arc`] and passed to request handlers via Axum's
/// `State` extractor. The metric handles are the only mutable state shared
/// between requests.
pub struct AppState {
    /// Metrics registry shared with the instrumentation middleware and the
    /// exporter.
    pub metrics: Arc<MetricsRegistry>,
    /// Decides simulated delay and failures for `GET /api/data`.
    pub outcomes: Arc<dyn OutcomeGenerator>,
}

impl AppState {
    pub fn new(metrics: Arc<MetricsRegistry>, outcomes: Arc<dyn OutcomeGenerator>) -> Self {
        Self { metrics, outcomes }
    }
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
