//! Turns inbound platform events into registry calls and replies.

use std::{sync::Arc, time::Duration};

use {
    chrono::{DateTime, Utc},
    tracing::{debug, error, warn},
    warden_channels::{
        ChannelRef, ChatPlatform, DeletedMessage, InboundMessage, Notice, Reaction,
    },
    warden_config::WardenConfig,
    warden_store::DocumentStore,
};

use crate::{
    Error,
    commands::Command,
    lock::LockRegistry,
    presence::PresenceRegistry,
    snipe::SnipeRegistry,
};

/// What the platform should do in response to a message, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send a notice to the message's channel.
    Notice(Notice),
    /// React to the message itself.
    React(Reaction),
}

pub struct EventRouter {
    prefix: String,
    reply_fetch_timeout: Duration,
    platform: Arc<dyn ChatPlatform>,
    presence: PresenceRegistry,
    snipe: SnipeRegistry,
    lock: LockRegistry,
}

impl EventRouter {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        platform: Arc<dyn ChatPlatform>,
        config: &WardenConfig,
    ) -> Self {
        Self {
            prefix: config.discord.prefix.clone(),
            reply_fetch_timeout: Duration::from_secs(config.presence.reply_fetch_timeout_secs),
            platform,
            presence: PresenceRegistry::new(Arc::clone(&store)),
            snipe: SnipeRegistry::new(Arc::clone(&store), config.snipe.capacity),
            lock: LockRegistry::new(store),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn snipe(&self) -> &SnipeRegistry {
        &self.snipe
    }

    pub fn lock(&self) -> &LockRegistry {
        &self.lock
    }

    pub async fn on_message(&self, message: &InboundMessage) -> Vec<Reply> {
        self.on_message_at(message, Utc::now()).await
    }

    /// Presence notice first, then the command result if the message is a
    /// command. Failures are logged or turned into notices, never returned.
    pub async fn on_message_at(&self, message: &InboundMessage, now: DateTime<Utc>) -> Vec<Reply> {
        if message.author.bot {
            return Vec::new();
        }

        let mut replies = Vec::new();

        let replied_author = self.replied_author(message).await;
        match self
            .presence
            .on_incoming_message(message, replied_author.as_deref(), now)
            .await
        {
            Ok(decision) => replies.extend(decision.into_notice().map(Reply::Notice)),
            Err(err) => {
                error!(message_id = %message.id, error = %err, "presence check failed");
            },
        }

        if let Some(command) = Command::parse(&self.prefix, &message.content) {
            debug!(
                command = command.name(),
                channel_id = %message.channel.id,
                author_id = %message.author.id,
                "dispatching command"
            );
            replies.extend(self.dispatch(message, command, now).await);
        }

        replies
    }

    pub async fn on_message_delete(&self, message: &DeletedMessage) {
        if let Err(err) = self.snipe.record_deletion(message, Utc::now()).await {
            error!(
                channel_id = %message.channel_id,
                error = %err,
                "failed to record deleted message"
            );
        }
    }

    /// Author of the message being replied to: the inline reference when the
    /// platform sent one, otherwise a bounded fetch. `None` skips the reply
    /// check.
    async fn replied_author(&self, message: &InboundMessage) -> Option<String> {
        let reference = message.reply_to.as_ref()?;
        if let Some(author_id) = &reference.author_id {
            return Some(author_id.clone());
        }

        let fetch = self
            .platform
            .fetch_message_author(&reference.channel_id, &reference.message_id);
        match tokio::time::timeout(self.reply_fetch_timeout, fetch).await {
            Ok(Ok(author)) => Some(author.id),
            Ok(Err(err)) => {
                warn!(
                    message_id = %reference.message_id,
                    error = %err,
                    "could not fetch replied message"
                );
                None
            },
            Err(_) => {
                warn!(
                    message_id = %reference.message_id,
                    timeout_secs = self.reply_fetch_timeout.as_secs(),
                    "timed out fetching replied message"
                );
                None
            },
        }
    }

    async fn dispatch(
        &self,
        message: &InboundMessage,
        command: Command,
        now: DateTime<Utc>,
    ) -> Vec<Reply> {
        let actor = &message.author;
        match command {
            Command::Afk { status } => match self.presence.set_away(&actor.id, status, now).await {
                Ok(entry) => vec![Reply::Notice(Notice::AwaySet {
                    user_id: actor.id.clone(),
                    status: entry.status_text().to_string(),
                })],
                Err(err) => {
                    error!(user_id = %actor.id, error = %err, "afk command failed");
                    Vec::new()
                },
            },
            Command::Snipe { page } => {
                match self.snipe.show(&message.channel.id, page, now).await {
                    Ok(view) => vec![Reply::Notice(view.into_notice(&actor.id))],
                    Err(err) => {
                        error!(
                            channel_id = %message.channel.id,
                            error = %err,
                            "snipe command failed"
                        );
                        vec![Reply::Notice(Notice::SnipeFailed)]
                    },
                }
            },
            Command::ClearSnipe => {
                let Some(guild_id) = message.channel.guild_id else {
                    return Vec::new();
                };
                match self
                    .snipe
                    .clear_as(self.platform.as_ref(), guild_id, &actor.id, &message.channel.id)
                    .await
                {
                    Ok(outcome) => vec![Reply::Notice(outcome.into_notice(&actor.id))],
                    Err(err) => failure(&actor.id, "clearsnipe", err),
                }
            },
            Command::Lock { target } => {
                let result = match self.target_channel(message, target).await {
                    Ok(channel) => self
                        .lock
                        .lock(self.platform.as_ref(), &channel, actor)
                        .await
                        .map(|_| Reply::React(Reaction::Locked)),
                    Err(err) => Err(err),
                };
                match result {
                    Ok(reply) => vec![reply],
                    Err(err) => failure(&actor.id, "lock", err),
                }
            },
            Command::Unlock { target } => {
                let result = match self.target_channel(message, target).await {
                    Ok(channel) => self
                        .lock
                        .unlock(self.platform.as_ref(), &channel, actor)
                        .await
                        .map(|_| Reply::React(Reaction::Unlocked)),
                    Err(err) => Err(err),
                };
                match result {
                    Ok(reply) => vec![reply],
                    Err(err) => failure(&actor.id, "unlock", err),
                }
            },
        }
    }

    /// The channel a lock command acts on: the named one, or the channel the
    /// command was sent in.
    async fn target_channel(
        &self,
        message: &InboundMessage,
        target: Option<String>,
    ) -> crate::Result<ChannelRef> {
        let guild_id = message.channel.guild_id.ok_or(Error::NotInGuild)?;
        match target {
            Some(id) if id != message.channel.id => {
                Ok(self.platform.resolve_channel(guild_id, &id).await?)
            },
            _ => Ok(message.channel.clone()),
        }
    }
}

/// Map a command error to what the actor sees.
fn failure(actor_id: &str, command: &'static str, err: Error) -> Vec<Reply> {
    match err {
        Error::PermissionDenied {
            subject,
            capability,
        } => vec![Reply::Notice(Notice::MissingPermission {
            actor_id: actor_id.to_string(),
            subject,
            capability,
        })],
        Error::PlatformRejected { message } => {
            warn!(command, error = %message, "platform rejected command");
            vec![Reply::Notice(Notice::CommandFailed {
                actor_id: actor_id.to_string(),
            })]
        },
        Error::Platform(source) => {
            warn!(command, error = %source, "platform lookup failed");
            vec![Reply::Notice(Notice::CommandFailed {
                actor_id: actor_id.to_string(),
            })]
        },
        Error::NotInGuild => {
            debug!(command, "ignoring guild command outside a guild");
            Vec::new()
        },
        Error::Store(source) => {
            error!(command, error = %source, "command failed to persist");
            Vec::new()
        },
    }
}
