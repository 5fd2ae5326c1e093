//! Liveness and service facts

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use submarine_payreq::Currency;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Deposit currencies accepted by `/swap`, by HRP
    pub currencies: Vec<&'static str>,
    pub swap_expiry_hours: u64,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        currencies: Currency::ALL.iter().map(|c| c.hrp).collect(),
        swap_expiry_hours: state.swap_expiry.as_secs() / 3600,
    })
}
