//! Health check

use axum::{extract::State, http::StatusCode};

use crate::api::middleware::AppState;

/// GET /healthz - 200 when the database answers, 503 otherwise
pub async fn healthz(State(state): State<AppState>) -> StatusCode {
    match state.pool.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Health check failed: {:#}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
