//! Channels whose `send_messages` permission was revoked for everyone.

use std::{collections::BTreeMap, sync::Arc};

use {
    serde::{Deserialize, Serialize},
    tracing::{debug, info, warn},
    warden_channels::{Author, Capability, ChannelRef, ChatPlatform, Guard, Subject},
    warden_store::{Document, DocumentStore},
};

use crate::{Error, Result};

/// Document name in the store.
pub const DOCUMENT: &str = "lock";

/// Locking and unlocking need `manage_channels` on the member and the bot.
pub const LOCK_GUARD: Guard = Guard::actor_and_bot(Capability::ManageChannels);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub channel_name: String,
    /// Display name of the member who locked the channel.
    pub locked_by: String,
    pub guild_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDocument {
    /// Channel id → lock entry.
    #[serde(default)]
    pub locked_channels: BTreeMap<String, LockEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Lock,
    Unlock,
}

impl Action {
    fn allowed(self) -> bool {
        matches!(self, Self::Unlock)
    }

    fn reason(self, actor: &str) -> String {
        match self {
            Self::Lock => format!("Channel locked by {actor}"),
            Self::Unlock => format!("Channel unlocked by {actor}"),
        }
    }
}

pub struct LockRegistry {
    document: Document<LockDocument>,
}

impl LockRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            document: Document::new(store, DOCUMENT),
        }
    }

    /// Deny `send_messages` for everyone in `channel`, then record the lock.
    /// Re-locking a locked channel overwrites its entry.
    pub async fn lock(
        &self,
        platform: &dyn ChatPlatform,
        channel: &ChannelRef,
        actor: &Author,
    ) -> Result<LockEntry> {
        let guild_id = self.apply(platform, channel, actor, Action::Lock).await?;

        let entry = LockEntry {
            channel_name: channel.name.clone(),
            locked_by: actor.name.clone(),
            guild_id,
        };
        let stored = entry.clone();
        let channel_id = channel.id.clone();
        self.document
            .update(move |doc| doc.locked_channels.insert(channel_id, stored))
            .await?;
        info!(channel_id = %channel.id, guild_id, locked_by = %actor.name, "channel locked");
        Ok(entry)
    }

    /// Allow `send_messages` again and forget the lock. Unlocking a channel
    /// with no recorded lock still restores the permission.
    pub async fn unlock(
        &self,
        platform: &dyn ChatPlatform,
        channel: &ChannelRef,
        actor: &Author,
    ) -> Result<Option<LockEntry>> {
        let guild_id = self.apply(platform, channel, actor, Action::Unlock).await?;

        let removed = self
            .document
            .update(|doc| doc.locked_channels.remove(&channel.id))
            .await?;
        info!(
            channel_id = %channel.id,
            guild_id,
            was_recorded = removed.is_some(),
            "channel unlocked"
        );
        Ok(removed)
    }

    /// Guard check and permission change shared by lock and unlock. Nothing
    /// is recorded when this fails.
    async fn apply(
        &self,
        platform: &dyn ChatPlatform,
        channel: &ChannelRef,
        actor: &Author,
        action: Action,
    ) -> Result<u64> {
        let guild_id = channel.guild_id.ok_or(Error::NotInGuild)?;
        LOCK_GUARD.check(platform, guild_id, &actor.id).await?;

        platform
            .set_channel_send_permission(
                guild_id,
                &channel.id,
                action.allowed(),
                &action.reason(&actor.name),
            )
            .await
            .map_err(|err| {
                if err.is_forbidden() {
                    debug!(channel_id = %channel.id, error = %err, "permission change forbidden");
                    Error::PermissionDenied {
                        subject: Subject::Bot,
                        capability: LOCK_GUARD.capability,
                    }
                } else {
                    warn!(
                        channel_id = %channel.id,
                        error = %err,
                        ?action,
                        "permission change failed"
                    );
                    Error::platform_rejected(err.to_string())
                }
            })?;
        Ok(guild_id)
    }

    pub async fn is_locked(&self, channel_id: &str) -> Result<bool> {
        Ok(self.get(channel_id).await?.is_some())
    }

    pub async fn get(&self, channel_id: &str) -> Result<Option<LockEntry>> {
        Ok(self
            .document
            .read()
            .await?
            .locked_channels
            .remove(channel_id))
    }

    /// Locked channels, optionally restricted to one guild.
    pub async fn list(&self, guild_id: Option<u64>) -> Result<Vec<(String, LockEntry)>> {
        let doc = self.document.read().await?;
        Ok(doc
            .locked_channels
            .into_iter()
            .filter(|(_, entry)| guild_id.is_none_or(|g| entry.guild_id == g))
            .collect())
    }
}
