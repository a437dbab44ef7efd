use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::SharedState;

/// Path of the data route, also used as the `endpoint` label of
/// `error_count`.
pub const DATA_ENDPOINT: &str = "/api/data";

pub const SAMPLE_DATA: &str = "Sample data";

/// Response body for `GET /api/data`.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub data: &'static str,
    /// Seconds since the Unix epoch, with sub-second precision.
    pub timestamp: f64,
}

/// `GET /api/data`
///
/// Suspends for the generator's delay without blocking other requests,
/// then either answers with the sample payload or, when the generator says
/// so, records an error and answers 500.
pub async fn get_data(State(state): State<SharedState>) -> Result<Json<DataResponse>, ApiError> {
    tokio::time::sleep(state.outcomes.delay()).await;

    if state.outcomes.should_fail() {
        let err = ApiError::SimulatedFailure;
        state
            .metrics
            .http
            .record_error(DATA_ENDPOINT, err.status().as_u16());
        tracing::debug!(endpoint = DATA_ENDPOINT, "{err}");
        return Err(err);
    }

    Ok(Json(DataResponse {
        data: SAMPLE_DATA,
        timestamp: current_unix_timestamp(),
    }))
}

/// Returns the current wall-clock time as seconds since Unix epoch.
///
/// On error (system clock before epoch) this falls back to 0.
fn current_unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs_f64()
}
