use async_trait::async_trait;

use crate::Result;

/// Who wrote a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    /// Display name at the time the event was observed.
    pub name: String,
    pub avatar_url: Option<String>,
    /// Bots and webhooks. Their messages are never tracked.
    pub bot: bool,
}

/// A channel as seen in an event or command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
}

/// Pointer from a reply to the message it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyReference {
    pub channel_id: String,
    pub message_id: String,
    /// Set when the platform delivered the referenced message inline, so no
    /// fetch is needed to learn its author.
    pub author_id: Option<String>,
}

/// A message-received event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: String,
    pub channel: ChannelRef,
    pub author: Author,
    pub content: String,
    /// Mentioned user ids, in the order they appear.
    pub mentions: Vec<String>,
    pub reply_to: Option<ReplyReference>,
}

/// A message-deleted event for a message whose contents were still known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedMessage {
    pub channel_id: String,
    pub author: Author,
    pub content: String,
}

/// Platform permissions the bot checks before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageChannels,
    ManageMessages,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageChannels => "manage_channels",
            Self::ManageMessages => "manage_messages",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whose permissions are being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A guild member, by user id.
    Member(String),
    /// The bot's own account.
    Bot,
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member(id) => write!(f, "member {id}"),
            Self::Bot => f.write_str("bot"),
        }
    }
}

/// Calls the registries make into the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Look up a channel of `guild_id` by id, e.g. the target of `,lock #general`.
    async fn resolve_channel(&self, guild_id: u64, channel_id: &str) -> Result<ChannelRef>;

    /// Resolve the author of an earlier message. Crosses the network.
    async fn fetch_message_author(&self, channel_id: &str, message_id: &str) -> Result<Author>;

    /// Whether `subject` holds `capability` in the guild.
    async fn has_capability(
        &self,
        guild_id: u64,
        subject: &Subject,
        capability: Capability,
    ) -> Result<bool>;

    /// Allow or deny `send_messages` for the guild's default role in a channel,
    /// leaving every other permission bit of that overwrite untouched.
    async fn set_channel_send_permission(
        &self,
        guild_id: u64,
        channel_id: &str,
        allowed: bool,
        reason: &str,
    ) -> Result<()>;
}
