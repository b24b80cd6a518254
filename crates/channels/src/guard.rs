//! Capability checks shared by every privileged command.

use tracing::debug;

use crate::{
    Error,
    platform::{Capability, ChatPlatform, Subject},
};

/// Which parties must hold the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sides {
    /// Only the member invoking the command.
    Actor,
    /// The invoking member, then the bot itself.
    ActorAndBot,
}

/// Why a guarded command may not proceed.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("{subject} is missing permission: {capability}")]
    PermissionDenied {
        subject: Subject,
        capability: Capability,
    },

    /// The capability lookup itself failed.
    #[error(transparent)]
    Platform(#[from] Error),
}

/// A capability requirement, checked the same way for lock, unlock and clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pub capability: Capability,
    pub sides: Sides,
}

impl Guard {
    #[must_use]
    pub const fn actor(capability: Capability) -> Self {
        Self {
            capability,
            sides: Sides::Actor,
        }
    }

    #[must_use]
    pub const fn actor_and_bot(capability: Capability) -> Self {
        Self {
            capability,
            sides: Sides::ActorAndBot,
        }
    }

    /// Check the actor first, then (if required) the bot.
    pub async fn check(
        &self,
        platform: &dyn ChatPlatform,
        guild_id: u64,
        actor_id: &str,
    ) -> Result<(), GuardError> {
        let mut subjects = vec![Subject::Member(actor_id.to_string())];
        if self.sides == Sides::ActorAndBot {
            subjects.push(Subject::Bot);
        }

        for subject in subjects {
            if !platform
                .has_capability(guild_id, &subject, self.capability)
                .await?
            {
                debug!(
                    guild_id,
                    %subject,
                    capability = %self.capability,
                    "capability check failed"
                );
                return Err(GuardError::PermissionDenied {
                    subject,
                    capability: self.capability,
                });
            }
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            Result,
            platform::{Author, ChannelRef},
        },
        async_trait::async_trait,
        std::sync::Mutex,
    };

    struct FixedPlatform {
        member_has: bool,
        bot_has: bool,
        fail: bool,
        checked: Mutex<Vec<Subject>>,
    }

    impl FixedPlatform {
        fn new(member_has: bool, bot_has: bool) -> Self {
            Self {
                member_has,
                bot_has,
                fail: false,
                checked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatPlatform for FixedPlatform {
        async fn resolve_channel(&self, _: u64, channel_id: &str) -> Result<ChannelRef> {
            Err(Error::not_found(channel_id))
        }

        async fn fetch_message_author(&self, _: &str, message_id: &str) -> Result<Author> {
            Err(Error::not_found(message_id))
        }

        async fn has_capability(&self, _: u64, subject: &Subject, _: Capability) -> Result<bool> {
            self.checked.lock().unwrap().push(subject.clone());
            if self.fail {
                return Err(Error::unavailable("member not cached"));
            }
            Ok(match subject {
                Subject::Member(_) => self.member_has,
                Subject::Bot => self.bot_has,
            })
        }

        async fn set_channel_send_permission(
            &self,
            _: u64,
            _: &str,
            _: bool,
            _: &str,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn both_sides_pass() {
        let platform = FixedPlatform::new(true, true);
        let guard = Guard::actor_and_bot(Capability::ManageChannels);
        guard.check(&platform, 1, "42").await.unwrap();
        assert_eq!(
            *platform.checked.lock().unwrap(),
            vec![Subject::Member("42".into()), Subject::Bot]
        );
    }

    #[tokio::test]
    async fn actor_checked_before_bot() {
        let platform = FixedPlatform::new(false, false);
        let guard = Guard::actor_and_bot(Capability::ManageChannels);
        let err = guard.check(&platform, 1, "42").await.unwrap_err();
        assert!(matches!(
            err,
            GuardError::PermissionDenied {
                subject: Subject::Member(_),
                capability: Capability::ManageChannels
            }
        ));
        assert_eq!(platform.checked.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bot_missing_capability() {
        let platform = FixedPlatform::new(true, false);
        let guard = Guard::actor_and_bot(Capability::ManageChannels);
        let err = guard.check(&platform, 1, "42").await.unwrap_err();
        assert!(matches!(
            err,
            GuardError::PermissionDenied {
                subject: Subject::Bot,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn actor_only_skips_bot() {
        let platform = FixedPlatform::new(true, false);
        let guard = Guard::actor(Capability::ManageMessages);
        guard.check(&platform, 1, "42").await.unwrap();
        assert_eq!(platform.checked.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lookup_failure_is_platform_error() {
        let mut platform = FixedPlatform::new(true, true);
        platform.fail = true;
        let guard = Guard::actor(Capability::ManageMessages);
        assert!(matches!(
            guard.check(&platform, 1, "42").await,
            Err(GuardError::Platform(Error::Unavailable { .. }))
        ));
    }
}
