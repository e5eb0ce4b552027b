//! HTTP routes for the token service.
//!
//! Defines the Axum router and application state.

use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::TokenSigner;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers. Read-only after startup.
///
/// Handlers only need the signer; the app credentials live inside it.
#[derive(Clone)]
pub struct AppState {
    /// Token signer built from the configured app credentials.
    pub signer: Arc<dyn TokenSigner>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/api/v1/rtc/token` - Token issuance (POST)
/// - `/generateAgoraToken` - Same handler at the legacy function path (POST)
/// - `/health` - Liveness probe (simple "OK")
/// - `/ready` - Readiness probe (signs a probe grant)
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let app_routes = Router::new()
        .route("/api/v1/rtc/token", post(handlers::issue_token))
        .route("/generateAgoraToken", post(handlers::issue_token))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    app_routes
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}
