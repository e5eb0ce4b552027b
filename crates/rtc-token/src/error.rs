use thiserror::Error;

/// Errors produced while building or decoding an access token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid app id: {0}")]
    InvalidAppId(String),

    #[error("App certificate must not be empty")]
    EmptyAppCertificate,

    #[error("Field {field} is too long to encode ({len} bytes)")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    #[error("Unsupported token version: {0}")]
    UnsupportedVersion(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Token was not issued for this channel")]
    ChannelMismatch,

    #[error("Token was not issued for this uid")]
    UidMismatch,

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Random number generation failed")]
    Random,
}
