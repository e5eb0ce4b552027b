//! Privilege codes and the roles that map onto them.

/// A single privilege carried in a token, keyed by its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Privilege {
    JoinChannel = 1,
    PublishAudioStream = 2,
    PublishVideoStream = 3,
    PublishDataStream = 4,
    PublishAudioCdn = 5,
    PublishVideoCdn = 6,
    RequestPublishAudioStream = 7,
    RequestPublishVideoStream = 8,
    RequestPublishDataStream = 9,
    InvitePublishAudioStream = 10,
    InvitePublishVideoStream = 11,
    InvitePublishDataStream = 12,
    AdministrateChannel = 101,
    RtmLogin = 1000,
}

impl Privilege {
    /// Privileges granted to every role that may send media.
    pub const PUBLISH: [Privilege; 3] = [
        Privilege::PublishAudioStream,
        Privilege::PublishVideoStream,
        Privilege::PublishDataStream,
    ];

    /// Wire code of this privilege.
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for Privilege {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Privilege::JoinChannel,
            2 => Privilege::PublishAudioStream,
            3 => Privilege::PublishVideoStream,
            4 => Privilege::PublishDataStream,
            5 => Privilege::PublishAudioCdn,
            6 => Privilege::PublishVideoCdn,
            7 => Privilege::RequestPublishAudioStream,
            8 => Privilege::RequestPublishVideoStream,
            9 => Privilege::RequestPublishDataStream,
            10 => Privilege::InvitePublishAudioStream,
            11 => Privilege::InvitePublishVideoStream,
            12 => Privilege::InvitePublishDataStream,
            101 => Privilege::AdministrateChannel,
            1000 => Privilege::RtmLogin,
            other => return Err(other),
        })
    }
}

/// Participant role requested when building a token.
///
/// Roles are not embedded directly; they decide which privileges the
/// token carries. `Attendee`, `Publisher` and `Admin` produce identical
/// tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Role {
    Attendee = 0,
    Publisher = 1,
    Subscriber = 2,
    Admin = 101,
}

impl Role {
    /// Whether tokens for this role carry the publish privileges.
    pub fn can_publish(self) -> bool {
        matches!(self, Role::Attendee | Role::Publisher | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Attendee => "attendee",
            Role::Publisher => "publisher",
            Role::Subscriber => "subscriber",
            Role::Admin => "admin",
        }
    }
}
