//! Health check handlers for liveness and readiness probes.

use crate::models::{ReadinessResponse, TokenGrant};
use crate::routes::AppState;
use crate::services::token_issuer::{privilege_expire_ts, ISSUED_ROLE};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

/// Channel name used for the readiness self-check.
const PROBE_CHANNEL: &str = "readiness-probe";

/// Liveness probe. Returns "OK" while the process is serving.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe.
///
/// Signs a throwaway grant with the configured signer. Returns 200
/// `{"status":"ready"}` if signing works, otherwise 503
/// `{"status":"not_ready"}`. The probe token is discarded.
#[instrument(skip_all, name = "ts.health.ready")]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let probe = privilege_expire_ts(Utc::now().timestamp()).map(|privilege_expire_ts| TokenGrant {
        channel_name: PROBE_CHANNEL.to_string(),
        uid: 0,
        role: ISSUED_ROLE,
        privilege_expire_ts,
    });

    match probe.and_then(|grant| state.signer.sign(&grant)) {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(target: "ts.health", error = %e, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                }),
            )
        }
    }
}
