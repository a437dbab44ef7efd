//! Dummy app configuration.
//!
//! Everything is built from `Default`; there is no config file and no
//! environment lookup apart from `RUST_LOG` for the log filter.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use telemetry::MetricsConfig;

/// Default port of the business HTTP server.
pub const DEFAULT_APP_PORT: u16 = 5000;

/// Knobs for the simulated processing behaviour of `GET /api/data`.
#[derive(Clone, Debug)]
pub struct OutcomeConfig {
    /// Lower bound of the simulated processing delay.
    pub min_delay: Duration,
    /// Upper bound of the simulated processing delay (inclusive).
    pub max_delay: Duration,
    /// Probability in `[0, 1]` that a request is turned into a 500.
    pub error_rate: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            error_rate: 0.1,
        }
    }
}

/// Top-level configuration for the dummy app.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Address to bind the business HTTP server to.
    pub listen_addr: SocketAddr,
    pub outcomes: OutcomeConfig,
    /// Prometheus exporter settings; served on a separate port.
    pub metrics: MetricsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Bind to all interfaces so the container port mapping is reachable.
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_APP_PORT)),
            outcomes: OutcomeConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}
