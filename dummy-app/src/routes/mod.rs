//! HTTP routes of the dummy app and the instrumented router.

pub mod data;
pub mod home;

use axum::{Router, http::StatusCode, middleware as axum_mw, routing::get};

use crate::middleware;
use crate::state::SharedState;

/// Builds the business router: both routes plus a 404 fallback, all wrapped
/// by the instrumentation middleware.
pub fn router(state: SharedState) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route("/", get(home::home))
        .route(data::DATA_ENDPOINT, get(data::get_data))
        .fallback(not_found)
        .with_state(state)
        .layer(axum_mw::from_fn_with_state(metrics, middleware::instrument))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use telemetry::MetricsRegistry;
    use tower::ServiceExt;

    use super::*;
    use crate::config::OutcomeConfig;
    use crate::error::INTERNAL_ERROR_BODY;
    use crate::outcome::{FixedOutcomes, OutcomeGenerator, RandomOutcomes};
    use crate::state::AppState;

    fn app(outcomes: impl OutcomeGenerator + 'static) -> (Router, Arc<MetricsRegistry>) {
        let metrics = Arc::new(MetricsRegistry::new().expect("create metrics registry"));
        let state = Arc::new(AppState::new(metrics.clone(), Arc::new(outcomes)));
        (router(state), metrics)
    }

    fn fixed(delay_ms: u64, fail: bool) -> FixedOutcomes {
        FixedOutcomes {
            delay: Duration::from_millis(delay_ms),
            fail,
        }
    }

    async fn send_get(app: &Router, uri: &str) -> (StatusCode, String) {
        let req = Request::get(uri).body(Body::empty()).expect("build request");
        let resp = app.clone().oneshot(req).await.expect("infallible");
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
        (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
    }

    fn request_count(metrics: &MetricsRegistry, endpoint: &str) -> u64 {
        metrics
            .http
            .request_count
            .with_label_values(&[endpoint, "GET"])
            .get()
    }

    fn data_errors(metrics: &MetricsRegistry) -> u64 {
        metrics
            .http
            .error_count
            .with_label_values(&[data::DATA_ENDPOINT, "500"])
            .get()
    }

    #[tokio::test(start_paused = true)]
    async fn home_returns_welcome_and_is_counted_once() {
        let (app, metrics) = app(fixed(0, false));

        let (status, body) = send_get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, home::WELCOME_MESSAGE);

        assert_eq!(request_count(&metrics, "/"), 1);
        let hist = metrics.http.request_latency_seconds.with_label_values(&["/"]);
        assert_eq!(hist.get_sample_count(), 1);
        assert!(hist.get_sample_sum() >= 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn data_success_returns_sample_payload() {
        let (app, metrics) = app(fixed(300, false));

        let (status, body) = send_get(&app, data::DATA_ENDPOINT).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(json["data"], data::SAMPLE_DATA);
        assert!(json["timestamp"].as_f64().expect("float timestamp") > 0.0);

        assert_eq!(request_count(&metrics, data::DATA_ENDPOINT), 1);
        assert_eq!(data_errors(&metrics), 0);

        let hist = metrics
            .http
            .request_latency_seconds
            .with_label_values(&[data::DATA_ENDPOINT]);
        assert_eq!(hist.get_sample_count(), 1);
        let latency = hist.get_sample_sum();
        assert!((0.1..=0.6).contains(&latency), "latency {latency}");
    }

    #[tokio::test(start_paused = true)]
    async fn data_failure_returns_plain_500_and_is_still_measured() {
        let (app, metrics) = app(fixed(100, true));

        let (status, body) = send_get(&app, data::DATA_ENDPOINT).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_BODY);

        assert_eq!(request_count(&metrics, data::DATA_ENDPOINT), 1);
        assert_eq!(data_errors(&metrics), 1);
        assert_eq!(
            metrics
                .http
                .request_latency_seconds
                .with_label_values(&[data::DATA_ENDPOINT])
                .get_sample_count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn error_count_moves_only_for_500_responses() {
        let outcomes = RandomOutcomes::new(&OutcomeConfig {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            error_rate: 0.5,
        });
        let (app, metrics) = app(outcomes);

        let mut failures = 0;
        for _ in 0..200 {
            let (status, body) = send_get(&app, data::DATA_ENDPOINT).await;
            match status {
                StatusCode::OK => assert!(body.contains("\"timestamp\"")),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    assert_eq!(body, INTERNAL_ERROR_BODY);
                    failures += 1;
                }
                other => panic!("unexpected status {other}"),
            }
        }

        assert_eq!(request_count(&metrics, data::DATA_ENDPOINT), 200);
        assert_eq!(data_errors(&metrics), failures);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_are_all_counted() {
        const K: u64 = 64;
        let (app, metrics) = app(fixed(0, false));

        let handles: Vec<_> = (0..K)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send_get(&app, data::DATA_ENDPOINT).await })
            })
            .collect();
        for handle in handles {
            let (status, _) = handle.await.expect("request task");
            assert_eq!(status, StatusCode::OK);
        }

        assert_eq!(request_count(&metrics, data::DATA_ENDPOINT), K);
        assert_eq!(
            metrics
                .http
                .request_latency_seconds
                .with_label_values(&[data::DATA_ENDPOINT])
                .get_sample_count(),
            K
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_delays_do_not_serialize_requests() {
        let (app, _metrics) = app(fixed(500, false));
        let started = tokio::time::Instant::now();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send_get(&app, data::DATA_ENDPOINT).await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("request task");
        }

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_paths_are_instrumented() {
        let (app, metrics) = app(fixed(0, false));

        let (status, _) = send_get(&app, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(request_count(&metrics, "/missing"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scrape_reflects_accumulated_requests() {
        let (app, metrics) = app(fixed(0, true));
        for _ in 0..3 {
            send_get(&app, "/").await;
        }
        send_get(&app, data::DATA_ENDPOINT).await;

        let first = metrics.gather_text();
        let second = metrics.gather_text();
        for text in [&first, &second] {
            assert!(text.contains(r#"request_count{endpoint="/",method="GET"} 3"#));
            assert!(text.contains(r#"request_count{endpoint="/api/data",method="GET"} 1"#));
            assert!(text.contains(r#"error_count{endpoint="/api/data",status_code="500"} 1"#));
            assert!(text.contains(r#"request_latency_seconds_count{endpoint="/"} 3"#));
        }
    }
}
