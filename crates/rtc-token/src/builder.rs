//! Role-based token construction for RTC channels.

use crate::access_token::AccessToken;
use crate::error::TokenError;
use crate::privilege::{Privilege, Role};

/// Builds RTC channel tokens for a role.
pub struct RtcTokenBuilder;

impl RtcTokenBuilder {
    /// Build a token for a numeric uid.
    ///
    /// A uid of 0 produces a token usable by any uid in the channel.
    /// `privilege_expired_ts` is the Unix timestamp after which the granted
    /// privileges lapse (0 means they never expire).
    pub fn build_token_with_uid(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: u32,
        role: Role,
        privilege_expired_ts: u32,
    ) -> Result<String, TokenError> {
        Self::build_token_with_account(
            app_id,
            app_certificate,
            channel_name,
            &uid_to_account(uid),
            role,
            privilege_expired_ts,
        )
    }

    /// Build a token for a string account.
    pub fn build_token_with_account(
        app_id: &str,
        app_certificate: &str,
        channel_name: &str,
        account: &str,
        role: Role,
        privilege_expired_ts: u32,
    ) -> Result<String, TokenError> {
        let mut token = AccessToken::new(app_id, app_certificate, channel_name, account)?;
        grant_role(&mut token, role, privilege_expired_ts);
        token.build()
    }
}

/// Account string a numeric uid is signed under.
pub fn uid_to_account(uid: u32) -> String {
    if uid == 0 {
        String::new()
    } else {
        uid.to_string()
    }
}

pub(crate) fn grant_role(token: &mut AccessToken, role: Role, privilege_expired_ts: u32) {
    token.add_privilege(Privilege::JoinChannel, privilege_expired_ts);
    if role.can_publish() {
        for privilege in Privilege::PUBLISH {
            token.add_privilege(privilege, privilege_expired_ts);
        }
    }
}
