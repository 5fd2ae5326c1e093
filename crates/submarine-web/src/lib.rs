//! Submarine swap web service
//!
//! Serves the swap form, checks a Lightning invoice against a chosen
//! deposit currency, and hands out the on-chain deposit address that pays
//! the invoice.
//!
//! # Routes
//!
//! ```text
//! GET  /                   home page
//! GET  /swap               swap form
//! POST /swap               create a swap (plain text)
//! POST /ajaxvalidateform   cross-validate the form (plain text, empty = valid)
//! GET  /refund?id=N        refund page
//! GET  /health             health check
//! GET  /static/*           static assets
//! GET  /docs               OpenAPI docs
//! ```

pub mod config;
pub mod error;
pub mod templates;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use submarine_payreq::PublicKey;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::WebConfig;
pub use error::{WebError, WebResult};

/// Shared state for handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: WebConfig,
    pub broker_key: PublicKey,
    pub user_key: PublicKey,
    pub swap_expiry: Duration,
}

impl AppState {
    pub fn from_config(config: WebConfig) -> WebResult<Self> {
        let broker_key = PublicKey::from_hex(&config.broker_pubkey)
            .map_err(|e| WebError::Config(format!("broker key: {}", e)))?;
        let user_key = PublicKey::from_hex(&config.user_pubkey)
            .map_err(|e| WebError::Config(format!("user key: {}", e)))?;

        Ok(Self {
            swap_expiry: config.swap_expiry(),
            config,
            broker_key,
            user_key,
        })
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Submarine Swaps",
        version = "0.1.0",
        description = "Swap on-chain deposits for Lightning invoice payments",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::swap::create_swap,
        routes::validate::validate_form,
        routes::refund::refund,
    ),
    components(schemas(routes::SwapForm, routes::health::HealthResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "swap", description = "Swap creation and validation"),
        (name = "refund", description = "Deposit refunds")
    )
)]
pub struct ApiDoc;

/// Build the service router
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(routes::pages::home))
        .route("/swap", get(routes::pages::swap_form).post(routes::swap::create_swap))
        .route("/ajaxvalidateform", post(routes::validate::validate_form))
        .route("/refund", get(routes::refund::refund))
        .route("/health", get(routes::health::health_check))
        .nest_service("/static", static_files)
        .fallback(routes::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
