//! Token issuance handler.
//!
//! POST /api/v1/rtc/token (also served at POST /generateAgoraToken)
//!
//! Issues a publisher token for `{channelName, uid}` valid for one hour.

use crate::errors::TokenServiceError;
use crate::models::{TokenRequest, TokenResponse};
use crate::observability::metrics::{record_error, record_token_issuance};
use crate::observability::{hash_for_correlation, ErrorCategory};
use crate::routes::AppState;
use crate::services::token_issuer;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handle a token issuance request.
///
/// Body extraction failures are mapped to 400 instead of axum's default
/// rejection so every error shares the same JSON shape.
///
/// Instrumented with skip_all; only the channel hash and outcome are
/// recorded.
#[instrument(name = "ts.token.issue", skip_all, fields(channel_hash, status))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let start = Instant::now();

    let result = payload
        .map_err(TokenServiceError::from)
        .and_then(|Json(request)| {
            if let Some(channel_name) = request.channel_name.as_deref() {
                tracing::Span::current()
                    .record("channel_hash", hash_for_correlation(channel_name).as_str());
            }
            token_issuer::issue_token(state.signer.as_ref(), request, Utc::now().timestamp())
        });

    let duration = start.elapsed();
    let status = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("status", status);
    record_token_issuance(status, duration);

    match result {
        Ok(response) => {
            tracing::debug!(target: "ts.token", "Token issued");
            Ok(Json(response))
        }
        Err(e) => {
            let category = ErrorCategory::from(&e);
            tracing::debug!(target: "ts.token", error_category = category.as_str(), "Token request rejected");
            record_error("issue_token", category.as_str(), e.status_code());
            Err(e)
        }
    }
}
