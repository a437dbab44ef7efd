// dummy-app/src/main.rs

//! Dummy app binary.
//!
//! Serves two routes on the business port:
//!
//! - `GET /`
//! - `GET /api/data` (random 0.1-0.5s delay, 10% simulated 500s)
//!
//! Every request passes through an instrumentation middleware that feeds
//! `request_count`, `request_latency_seconds` and `error_count`, which a
//! separate Prometheus exporter serves on `/metrics`.

mod config;
mod error;
mod middleware;
mod outcome;
mod routes;
mod state;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::{net::TcpListener, signal};

use config::AppConfig;
use error::ServerError;
use outcome::{OutcomeGenerator, RandomOutcomes};
use state::{AppState, SharedState};
use telemetry::{MetricsRegistry, serve_prometheus};

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "dummy_app=debug,telemetry=info".to_string()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let cfg = AppConfig::default();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting dummy app");

    // ---------------------------
    // Metrics
    // ---------------------------

    let metrics = Arc::new(MetricsRegistry::new()?);

    // Bind before spawning so a busy port stops startup instead of leaving
    // the service running without a scrape endpoint.
    if cfg.metrics.enabled {
        let listener = bind_metrics_exporter(cfg.metrics.listen_addr).await?;
        let metrics_clone = metrics.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_prometheus(listener, metrics_clone).await {
                tracing::error!("metrics HTTP server error: {e}");
            }
        });
        tracing::info!(
            "metrics exporter listening on http://{}/metrics",
            cfg.metrics.listen_addr
        );
    }

    // ---------------------------
    // Shared state
    // ---------------------------

    let outcomes: Arc<dyn OutcomeGenerator> = Arc::new(RandomOutcomes::new(&cfg.outcomes));
    let app_state: SharedState = Arc::new(AppState::new(metrics, outcomes));

    // ---------------------------
    // HTTP router
    // ---------------------------

    let app = routes::router(app_state);

    let listener = TcpListener::bind(cfg.listen_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: cfg.listen_addr,
            source,
        })?;

    tracing::info!("dummy app listening on http://{}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    Ok(())
}

async fn bind_metrics_exporter(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::MetricsBind { addr, source })
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    wait_for_shutdown(signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. If the handler could not be installed the
/// server keeps running instead of shutting down straight away.
async fn wait_for_shutdown(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!("failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
