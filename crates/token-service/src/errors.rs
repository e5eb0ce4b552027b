//! Token service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Messages for server-side failures are generic; the actual cause is
//! logged and never returned to the caller.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rtc_token::TokenError;
use serde::Serialize;
use thiserror::Error;

/// Token service error type.
///
/// Maps to HTTP status codes:
/// - BadRequest: 400 Bad Request
/// - Signing, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum TokenServiceError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Internal server error")]
    Internal,
}

impl TokenServiceError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            TokenServiceError::BadRequest(_) => 400,
            TokenServiceError::Signing(_) | TokenServiceError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for TokenServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            TokenServiceError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            TokenServiceError::Signing(err) => {
                tracing::error!(target: "ts.signing", error = %err, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SIGNING_ERROR",
                    "An internal signing error occurred".to_string(),
                )
            }
            TokenServiceError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<TokenError> for TokenServiceError {
    fn from(err: TokenError) -> Self {
        TokenServiceError::Signing(err.to_string())
    }
}

/// Body parse failures (missing body, wrong content type, bad JSON, wrong
/// field types) are client errors.
impl From<JsonRejection> for TokenServiceError {
    fn from(rejection: JsonRejection) -> Self {
        TokenServiceError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: TokenServiceError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, json)
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TokenServiceError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(TokenServiceError::Signing("x".into()).status_code(), 500);
        assert_eq!(TokenServiceError::Internal.status_code(), 500);
    }

    #[tokio::test]
    async fn test_bad_request_returns_reason() {
        let (status, body) =
            body_json(TokenServiceError::BadRequest("channelName is required".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], "channelName is required");
    }

    #[tokio::test]
    async fn test_signing_error_hides_details() {
        let (status, body) =
            body_json(TokenServiceError::Signing("certificate 5CFd... rejected".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "SIGNING_ERROR");
        assert_eq!(body["error"]["message"], "An internal signing error occurred");
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let (status, body) = body_json(TokenServiceError::Internal).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn test_from_token_error_is_signing() {
        let err = TokenServiceError::from(TokenError::EmptyAppCertificate);
        assert!(matches!(err, TokenServiceError::Signing(msg) if msg.contains("empty")));
    }
}
