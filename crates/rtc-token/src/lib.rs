//! RTC access token construction and decoding.
//!
//! Implements the version `006` access token understood by the real-time
//! communication SDKs. A token grants a participant (`uid`) a set of
//! privileges in one channel, each with its own expiry timestamp, and is
//! signed with the application certificate using HMAC-SHA256.
//!
//! ```text
//! token   = "006" || app_id || base64(content)
//! content = bytes(signature) || u32(crc32(channel)) || u32(crc32(uid)) || bytes(message)
//! message = u32(salt) || u32(ts) || map<u16 privilege, u32 expire_ts>
//! ```
//!
//! All integers are little-endian; `bytes(x)` is a `u16` length prefix
//! followed by `x`.
//!
//! # Example
//!
//! ```rust
//! use rtc_token::{AccessToken, Role, RtcTokenBuilder};
//!
//! let app_id = "970CA35de60c44645bbae8a215061b33";
//! let certificate = "5CFd2fd1755d40ecb72977518be15d3b";
//!
//! let token = RtcTokenBuilder::build_token_with_uid(
//!     app_id,
//!     certificate,
//!     "room42",
//!     7,
//!     Role::Publisher,
//!     1_700_003_600,
//! )?;
//!
//! let decoded = AccessToken::parse(&token)?;
//! decoded.verify(certificate, "room42", "7")?;
//! assert_eq!(decoded.role(), Role::Publisher);
//! # Ok::<(), rtc_token::TokenError>(())
//! ```

mod access_token;
mod builder;
mod error;
mod packer;
mod privilege;

pub use access_token::{AccessToken, DecodedToken, APP_ID_LENGTH, VERSION};
pub use builder::{uid_to_account, RtcTokenBuilder};
pub use error::TokenError;
pub use privilege::{Privilege, Role};
