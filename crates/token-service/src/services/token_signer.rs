//! Token signing capability.
//!
//! The issuance handler never builds tokens itself. It hands a
//! [`TokenGrant`] to a [`TokenSigner`], which lets tests swap in
//! [`mock::MockTokenSigner`].

use crate::config::Config;
use crate::errors::TokenServiceError;
use crate::models::TokenGrant;
use rtc_token::RtcTokenBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Builds a signed token for a grant.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, grant: &TokenGrant) -> Result<String, TokenServiceError>;
}

/// Production signer producing RTC access tokens.
pub struct RtcTokenSigner {
    app_id: String,
    app_certificate: SecretString,
}

impl RtcTokenSigner {
    pub fn new(app_id: String, app_certificate: SecretString) -> Self {
        Self {
            app_id,
            app_certificate,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.app_id.clone(), config.app_certificate.clone())
    }
}

impl TokenSigner for RtcTokenSigner {
    fn sign(&self, grant: &TokenGrant) -> Result<String, TokenServiceError> {
        let token = RtcTokenBuilder::build_token_with_uid(
            &self.app_id,
            self.app_certificate.expose_secret(),
            &grant.channel_name,
            grant.uid,
            grant.role,
            grant.privilege_expire_ts,
        )?;
        Ok(token)
    }
}

/// Mock signer for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every grant and returns a deterministic fake token.
    pub struct MockTokenSigner {
        grants: Mutex<Vec<TokenGrant>>,
        return_error: bool,
    }

    impl MockTokenSigner {
        /// Create a mock that always signs.
        pub fn accepting() -> Self {
            Self {
                grants: Mutex::new(Vec::new()),
                return_error: false,
            }
        }

        /// Create a mock that always fails to sign.
        pub fn failing() -> Self {
            Self {
                grants: Mutex::new(Vec::new()),
                return_error: true,
            }
        }

        /// Grants received so far, in call order.
        pub fn grants(&self) -> Vec<TokenGrant> {
            self.grants
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.grants
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .len()
        }
    }

    impl TokenSigner for MockTokenSigner {
        fn sign(&self, grant: &TokenGrant) -> Result<String, TokenServiceError> {
            self.grants
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(grant.clone());

            if self.return_error {
                return Err(TokenServiceError::Signing(
                    "Mock signer error".to_string(),
                ));
            }

            Ok(format!(
                "mock:{}:{}:{}:{}",
                grant.channel_name,
                grant.uid,
                grant.role.as_str(),
                grant.privilege_expire_ts
            ))
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used, clippy::expect_used)]
    mod tests {
        use super::*;
        use rtc_token::Role;

        fn grant() -> TokenGrant {
            TokenGrant {
                channel_name: "room42".to_string(),
                uid: 7,
                role: Role::Publisher,
                privilege_expire_ts: 1_700_003_600,
            }
        }

        #[test]
        fn test_mock_accepting_records_grants() {
            let mock = MockTokenSigner::accepting();
            let token = mock.sign(&grant()).unwrap();

            assert_eq!(token, "mock:room42:7:publisher:1700003600");
            assert_eq!(mock.call_count(), 1);
            assert_eq!(mock.grants(), vec![grant()]);
        }

        #[test]
        fn test_mock_failing() {
            let mock = MockTokenSigner::failing();
            let result = mock.sign(&grant());

            assert!(matches!(result, Err(TokenServiceError::Signing(_))));
            assert_eq!(mock.call_count(), 1);
        }
    }
}
