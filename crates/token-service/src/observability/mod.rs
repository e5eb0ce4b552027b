//! Observability for the token service.
//!
//! # Privacy by Default
//!
//! Handlers use `#[instrument(skip_all)]` and record an explicit allow-list
//! of fields:
//! - **SAFE**: outcome status, error category
//! - **HASHED**: channel name (truncated SHA-256, correlation only)
//! - **NEVER**: app certificate, issued tokens, uid

pub mod metrics;

use crate::errors::TokenServiceError;
use ring::digest::{digest, SHA256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// One-way and truncated; not suitable for protecting secrets.
pub fn hash_for_correlation(value: &str) -> String {
    let hash = digest(&SHA256, value.as_bytes());
    hex::encode(hash.as_ref().get(..4).unwrap_or_default())
}

/// Bounded error categories used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Signing,
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Signing => "signing",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&TokenServiceError> for ErrorCategory {
    fn from(err: &TokenServiceError) -> Self {
        match err {
            TokenServiceError::BadRequest(_) => ErrorCategory::Validation,
            TokenServiceError::Signing(_) => ErrorCategory::Signing,
            TokenServiceError::Internal => ErrorCategory::Internal,
        }
    }
}
