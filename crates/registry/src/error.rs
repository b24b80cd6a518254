use {
    thiserror::Error,
    warden_channels::{Capability, GuardError, Subject},
};

#[derive(Debug, Error)]
pub enum Error {
    /// Loading or saving a registry document failed.
    #[error(transparent)]
    Store(#[from] warden_store::Error),

    /// The actor or the bot lacks a required capability. Nothing was changed.
    #[error("{subject} is missing permission: {capability}")]
    PermissionDenied {
        subject: Subject,
        capability: Capability,
    },

    /// The platform refused the change even though the capability checks
    /// passed. Nothing was recorded.
    #[error("platform rejected the request: {message}")]
    PlatformRejected { message: String },

    /// A platform lookup (member, channel) failed.
    #[error(transparent)]
    Platform(#[from] warden_channels::Error),

    #[error("command requires a guild channel")]
    NotInGuild,
}

impl Error {
    #[must_use]
    pub fn platform_rejected(message: impl Into<String>) -> Self {
        Self::PlatformRejected {
            message: message.into(),
        }
    }
}

impl From<GuardError> for Error {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::PermissionDenied {
                subject,
                capability,
            } => Self::PermissionDenied {
                subject,
                capability,
            },
            GuardError::Platform(source) => Self::Platform(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
