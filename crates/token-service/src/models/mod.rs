//! Token service models.
//!
//! Wire types for the HTTP API and the grant passed to the signer.

use rtc_token::Role;
use serde::{Deserialize, Serialize};

/// Participant identifier as sent by clients: a JSON number or a decimal
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UidInput {
    Number(i64),
    Text(String),
}

/// Token issuance request body.
///
/// Both fields are optional at the serde level so that a missing field
/// is reported as a 400 with a field-specific message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub channel_name: Option<String>,
    pub uid: Option<UidInput>,
}

/// Token issuance response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Readiness probe response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: String,
}

/// Everything the signer needs to build one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub channel_name: String,
    pub uid: u32,
    pub role: Role,
    /// Unix timestamp after which the granted privileges lapse.
    pub privilege_expire_ts: u32,
}
