//! Version `006` access token: building, parsing and signature checks.

use crate::error::TokenError;
use crate::packer;
use crate::privilege::{Privilege, Role};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::BytesMut;
use chrono::Utc;
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

/// Token version prefix.
pub const VERSION: &str = "006";

/// Fixed length of an application id.
pub const APP_ID_LENGTH: usize = 32;

/// Upper bound (inclusive) of the random salt.
const SALT_MAX: u32 = 99_999_999;

/// Lifetime of the token message itself, independent of privilege expiry.
const MESSAGE_TTL_SECONDS: i64 = 24 * 3600;

/// An unsigned access token under construction.
///
/// The certificate is held as a [`SecretString`] so the struct can be
/// logged with `{:?}` without leaking it.
pub struct AccessToken {
    app_id: String,
    app_certificate: SecretString,
    channel_name: String,
    uid: String,
    salt: u32,
    ts: u32,
    privileges: BTreeMap<u16, u32>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .field("channel_name", &self.channel_name)
            .field("uid", &self.uid)
            .field("salt", &self.salt)
            .field("ts", &self.ts)
            .field("privileges", &self.privileges)
            .finish()
    }
}

impl AccessToken {
    /// Create a token with a random salt and a message timestamp 24 hours
    /// from now. `uid` is the account string (`""` for "any uid").
    pub fn new(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: &str,
    ) -> Result<Self, TokenError> {
        validate_app_id(app_id)?;
        if app_certificate.is_empty() {
            return Err(TokenError::EmptyAppCertificate);
        }

        let now = Utc::now().timestamp();
        let ts = u32::try_from(now + MESSAGE_TTL_SECONDS)
            .map_err(|_| TokenError::TimestampOutOfRange(now))?;

        Ok(Self {
            app_id: app_id.to_string(),
            app_certificate: SecretString::from(app_certificate),
            channel_name: channel_name.to_string(),
            uid: uid.to_string(),
            salt: random_salt()?,
            ts,
            privileges: BTreeMap::new(),
        })
    }

    /// Override the salt and message timestamp (for reproducible tokens).
    pub fn with_salt_and_ts(mut self, salt: u32, ts: u32) -> Self {
        self.salt = salt;
        self.ts = ts;
        self
    }

    /// Grant `privilege` until `expire_ts` (Unix seconds, 0 = never).
    pub fn add_privilege(&mut self, privilege: Privilege, expire_ts: u32) {
        self.privileges.insert(privilege.code(), expire_ts);
    }

    /// Sign and encode the token.
    pub fn build(&self) -> Result<String, TokenError> {
        let mut message = BytesMut::new();
        message.extend_from_slice(&self.salt.to_le_bytes());
        message.extend_from_slice(&self.ts.to_le_bytes());
        packer::put_privileges(&mut message, &self.privileges)?;

        let signature = sign(
            self.app_certificate.expose_secret(),
            &self.app_id,
            &self.channel_name,
            &self.uid,
            &message,
        );

        let mut content = BytesMut::new();
        packer::put_bytes(&mut content, "signature", signature.as_ref())?;
        content.extend_from_slice(&crc32fast::hash(self.channel_name.as_bytes()).to_le_bytes());
        content.extend_from_slice(&crc32fast::hash(self.uid.as_bytes()).to_le_bytes());
        packer::put_bytes(&mut content, "message", &message)?;

        Ok(format!(
            "{}{}{}",
            VERSION,
            self.app_id,
            STANDARD.encode(&content)
        ))
    }

    /// Decode a token string without checking its signature.
    ///
    /// Use [`DecodedToken::verify`] to check it against a certificate,
    /// channel and uid.
    pub fn parse(token: &str) -> Result<DecodedToken, TokenError> {
        let version = token
            .get(..VERSION.len())
            .ok_or_else(|| TokenError::Malformed("token too short".to_string()))?;
        if version != VERSION {
            return Err(TokenError::UnsupportedVersion(version.to_string()));
        }

        let app_id_end = VERSION.len() + APP_ID_LENGTH;
        let app_id = token
            .get(VERSION.len()..app_id_end)
            .ok_or_else(|| TokenError::Malformed("missing app id".to_string()))?;
        let encoded = token
            .get(app_id_end..)
            .ok_or_else(|| TokenError::Malformed("missing content".to_string()))?;

        let content = STANDARD.decode(encoded)?;
        let mut data = content.as_slice();

        let signature = packer::get_bytes(&mut data)?;
        let crc_channel_name = packer::get_u32(&mut data)?;
        let crc_uid = packer::get_u32(&mut data)?;
        let message = packer::get_bytes(&mut data)?;

        let mut fields = message.as_slice();
        let salt = packer::get_u32(&mut fields)?;
        let ts = packer::get_u32(&mut fields)?;
        let privileges = packer::get_privileges(&mut fields)?;

        Ok(DecodedToken {
            app_id: app_id.to_string(),
            signature,
            crc_channel_name,
            crc_uid,
            message,
            salt,
            ts,
            privileges,
        })
    }
}

/// The fields of a parsed token.
///
/// Channel name and uid are not recoverable from a token, only their
/// CRC32 checksums; [`DecodedToken::verify`] checks them against expected
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub app_id: String,
    pub crc_channel_name: u32,
    pub crc_uid: u32,
    pub salt: u32,
    pub ts: u32,
    pub privileges: BTreeMap<u16, u32>,
    signature: Vec<u8>,
    message: Vec<u8>,
}

impl DecodedToken {
    /// Check that the token was issued for `channel_name`/`uid` and signed
    /// with `app_certificate`.
    pub fn verify(
        &self,
        app_certificate: &str,
        channel_name: &str,
        uid: &str,
    ) -> Result<(), TokenError> {
        if crc32fast::hash(channel_name.as_bytes()) != self.crc_channel_name {
            return Err(TokenError::ChannelMismatch);
        }
        if crc32fast::hash(uid.as_bytes()) != self.crc_uid {
            return Err(TokenError::UidMismatch);
        }

        let key = hmac::Key::new(hmac::HMAC_SHA256, app_certificate.as_bytes());
        let mut signed = Vec::with_capacity(
            self.app_id.len() + channel_name.len() + uid.len() + self.message.len(),
        );
        signed.extend_from_slice(self.app_id.as_bytes());
        signed.extend_from_slice(channel_name.as_bytes());
        signed.extend_from_slice(uid.as_bytes());
        signed.extend_from_slice(&self.message);

        // Constant-time comparison
        hmac::verify(&key, &signed, &self.signature).map_err(|_| TokenError::SignatureMismatch)
    }

    /// Expiry of `privilege`, if the token carries it.
    pub fn privilege_expire(&self, privilege: Privilege) -> Option<u32> {
        self.privileges.get(&privilege.code()).copied()
    }

    /// Role implied by the carried privileges.
    ///
    /// Publisher, attendee and admin tokens are indistinguishable on the
    /// wire and all decode as [`Role::Publisher`].
    pub fn role(&self) -> Role {
        let publishes = Privilege::PUBLISH
            .iter()
            .any(|p| self.privileges.contains_key(&p.code()));
        if publishes {
            Role::Publisher
        } else {
            Role::Subscriber
        }
    }
}

fn validate_app_id(app_id: &str) -> Result<(), TokenError> {
    if app_id.len() != APP_ID_LENGTH || !app_id.is_ascii() {
        return Err(TokenError::InvalidAppId(format!(
            "expected {} ASCII characters, got {}",
            APP_ID_LENGTH,
            app_id.len()
        )));
    }
    Ok(())
}

fn random_salt() -> Result<u32, TokenError> {
    let mut bytes = [0u8; 4];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| TokenError::Random)?;
    Ok(u32::from_le_bytes(bytes) % SALT_MAX + 1)
}

fn sign(certificate: &str, app_id: &str, channel_name: &str, uid: &str, message: &[u8]) -> hmac::Tag {
    let key = hmac::Key::new(hmac::HMAC_SHA256, certificate.as_bytes());
    let mut ctx = hmac::Context::with_key(&key);
    ctx.update(app_id.as_bytes());
    ctx.update(channel_name.as_bytes());
    ctx.update(uid.as_bytes());
    ctx.update(message);
    ctx.sign()
}
