//! Service layer for the token service.
//!
//! # Components
//!
//! - `token_issuer` - Request validation, expiry computation and signing
//! - `token_signer` - The signing capability and its test double

pub mod token_issuer;
pub mod token_signer;

pub use token_signer::mock::MockTokenSigner;
pub use token_signer::{RtcTokenSigner, TokenSigner};
