//! Configuration for the metrics exporter.
//!
//! Binaries construct a [`MetricsConfig`] from defaults and decide whether
//! to spawn the `/metrics` server and where to bind it.

use std::net::{Ipv4Addr, SocketAddr};

/// Default port the Prometheus exporter listens on.
pub const DEFAULT_METRICS_PORT: u16 = 8000;

/// Configuration for the Prometheus metrics exporter.
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Whether to run a `/metrics` HTTP exporter.
    pub enabled: bool,
    /// Address to bind the metrics HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        // Bind to all interfaces so a Prometheus container can reach it.
        Self {
            enabled: true,
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_METRICS_PORT)),
        }
    }
}
