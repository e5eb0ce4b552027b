//! Token issuance: request validation, expiry computation and signing.
//!
//! Every token is issued with the publisher role and a fixed one-hour
//! privilege window measured from issuance time.

use crate::errors::TokenServiceError;
use crate::models::{TokenGrant, TokenRequest, TokenResponse, UidInput};
use crate::services::token_signer::TokenSigner;
use rtc_token::Role;

/// Privilege validity window in seconds.
pub const TOKEN_TTL_SECONDS: u32 = 3600;

/// Role embedded in every issued token.
pub const ISSUED_ROLE: Role = Role::Publisher;

/// Longest channel name accepted by the RTC platform.
pub const MAX_CHANNEL_NAME_BYTES: usize = 64;

/// Validate `request`, compute its expiry from `now_unix` and sign it.
pub fn issue_token(
    signer: &dyn TokenSigner,
    request: TokenRequest,
    now_unix: i64,
) -> Result<TokenResponse, TokenServiceError> {
    let grant = build_grant(request, now_unix)?;
    let token = signer.sign(&grant)?;
    Ok(TokenResponse { token })
}

/// Turn a request into the grant handed to the signer.
pub fn build_grant(request: TokenRequest, now_unix: i64) -> Result<TokenGrant, TokenServiceError> {
    let channel_name = validate_channel_name(request.channel_name)?;
    let uid = validate_uid(request.uid)?;

    Ok(TokenGrant {
        channel_name,
        uid,
        role: ISSUED_ROLE,
        privilege_expire_ts: privilege_expire_ts(now_unix)?,
    })
}

/// `floor(now) + TOKEN_TTL_SECONDS`, as the u32 the token format carries.
pub fn privilege_expire_ts(now_unix: i64) -> Result<u32, TokenServiceError> {
    u32::try_from(now_unix)
        .ok()
        .and_then(|now| now.checked_add(TOKEN_TTL_SECONDS))
        .ok_or_else(|| {
            tracing::error!(target: "ts.token", now_unix, "Clock outside token timestamp range");
            TokenServiceError::Internal
        })
}

fn validate_channel_name(channel_name: Option<String>) -> Result<String, TokenServiceError> {
    let channel_name = channel_name
        .ok_or_else(|| TokenServiceError::BadRequest("channelName is required".to_string()))?;

    if channel_name.is_empty() {
        return Err(TokenServiceError::BadRequest(
            "channelName must not be empty".to_string(),
        ));
    }
    if channel_name.len() > MAX_CHANNEL_NAME_BYTES {
        return Err(TokenServiceError::BadRequest(format!(
            "channelName must be at most {} bytes",
            MAX_CHANNEL_NAME_BYTES
        )));
    }

    Ok(channel_name)
}

fn validate_uid(uid: Option<UidInput>) -> Result<u32, TokenServiceError> {
    let invalid = || {
        TokenServiceError::BadRequest(format!(
            "uid must be an integer between 0 and {}",
            u32::MAX
        ))
    };

    match uid.ok_or_else(|| TokenServiceError::BadRequest("uid is required".to_string()))? {
        UidInput::Number(n) => u32::try_from(n).map_err(|_| invalid()),
        UidInput::Text(s) => {
            // u32::from_str accepts a leading '+'; digits only here
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            s.parse::<u32>().map_err(|_| invalid())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::services::token_signer::mock::MockTokenSigner;

    const NOW: i64 = 1_700_000_000;

    fn request(channel_name: Option<&str>, uid: Option<UidInput>) -> TokenRequest {
        TokenRequest {
            channel_name: channel_name.map(str::to_string),
            uid,
        }
    }

    fn bad_request_message(result: Result<TokenGrant, TokenServiceError>) -> String {
        match result {
            Err(TokenServiceError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_issue_token_signs_publisher_grant() {
        let signer = MockTokenSigner::accepting();
        let response =
            issue_token(&signer, request(Some("room42"), Some(UidInput::Number(7))), NOW).unwrap();

        assert_eq!(response.token, "mock:room42:7:publisher:1700003600");
        assert_eq!(
            signer.grants(),
            vec![TokenGrant {
                channel_name: "room42".to_string(),
                uid: 7,
                role: Role::Publisher,
                privilege_expire_ts: 1_700_003_600,
            }]
        );
    }

    #[test]
    fn test_expiry_is_issuance_time_plus_ttl() {
        for now in [0_i64, 1, 1_234_567_890, NOW, i64::from(u32::MAX - TOKEN_TTL_SECONDS)] {
            let expire = privilege_expire_ts(now).unwrap();
            assert_eq!(i64::from(expire), now + i64::from(TOKEN_TTL_SECONDS));
        }
    }

    #[test]
    fn test_expiry_out_of_range_is_internal_error() {
        assert!(matches!(
            privilege_expire_ts(-1),
            Err(TokenServiceError::Internal)
        ));
        assert!(matches!(
            privilege_expire_ts(i64::from(u32::MAX)),
            Err(TokenServiceError::Internal)
        ));
    }

    #[test]
    fn test_different_times_produce_different_tokens() {
        let signer = MockTokenSigner::accepting();
        let first =
            issue_token(&signer, request(Some("room42"), Some(UidInput::Number(7))), NOW).unwrap();
        let second = issue_token(
            &signer,
            request(Some("room42"), Some(UidInput::Number(7))),
            NOW + 1,
        )
        .unwrap();

        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_role_is_always_publisher() {
        let signer = MockTokenSigner::accepting();
        for uid in [0_i64, 1, 7, i64::from(u32::MAX)] {
            issue_token(&signer, request(Some("room"), Some(UidInput::Number(uid))), NOW).unwrap();
        }

        assert!(signer.grants().iter().all(|g| g.role == Role::Publisher));
    }

    #[test]
    fn test_string_uid_is_accepted() {
        let grant = build_grant(
            request(Some("room42"), Some(UidInput::Text("7".to_string()))),
            NOW,
        )
        .unwrap();
        assert_eq!(grant.uid, 7);
    }

    #[test]
    fn test_missing_channel_name_is_rejected() {
        let msg = bad_request_message(build_grant(request(None, Some(UidInput::Number(7))), NOW));
        assert_eq!(msg, "channelName is required");
    }

    #[test]
    fn test_empty_channel_name_is_rejected() {
        let msg = bad_request_message(build_grant(
            request(Some(""), Some(UidInput::Number(7))),
            NOW,
        ));
        assert_eq!(msg, "channelName must not be empty");
    }

    #[test]
    fn test_long_channel_name_is_rejected() {
        let name = "a".repeat(MAX_CHANNEL_NAME_BYTES + 1);
        let msg = bad_request_message(build_grant(
            request(Some(name.as_str()), Some(UidInput::Number(7))),
            NOW,
        ));
        assert!(msg.contains("at most 64 bytes"));

        let name = "a".repeat(MAX_CHANNEL_NAME_BYTES);
        assert!(build_grant(request(Some(name.as_str()), Some(UidInput::Number(7))), NOW).is_ok());
    }

    #[test]
    fn test_missing_uid_is_rejected() {
        let msg = bad_request_message(build_grant(request(Some("room42"), None), NOW));
        assert_eq!(msg, "uid is required");
    }

    #[test]
    fn test_out_of_range_uids_are_rejected() {
        for uid in [
            UidInput::Number(-1),
            UidInput::Number(i64::from(u32::MAX) + 1),
            UidInput::Text("".to_string()),
            UidInput::Text("abc".to_string()),
            UidInput::Text("+7".to_string()),
            UidInput::Text("-7".to_string()),
            UidInput::Text("4294967296".to_string()),
        ] {
            let msg = bad_request_message(build_grant(request(Some("room42"), Some(uid)), NOW));
            assert!(msg.starts_with("uid must be an integer"));
        }
    }

    #[test]
    fn test_signer_failure_propagates() {
        let signer = MockTokenSigner::failing();
        let result = issue_token(&signer, request(Some("room42"), Some(UidInput::Number(7))), NOW);

        assert!(matches!(result, Err(TokenServiceError::Signing(_))));
    }

    #[test]
    fn test_invalid_request_never_reaches_signer() {
        let signer = MockTokenSigner::accepting();
        let result = issue_token(&signer, request(None, None), NOW);

        assert!(result.is_err());
        assert_eq!(signer.call_count(), 0);
    }
}
