//! [`ChatPlatform`] over serenity's HTTP client and gateway cache.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{
            Cache, ChannelId, GuildChannel, GuildId, Http, MessageId, PermissionOverwriteType,
            Permissions, RoleId, User, UserId,
        },
        model::id::TargetId,
    },
    tracing::debug,
};

use warden_channels::{Author, Capability, ChannelRef, ChatPlatform, Error, Result, Subject};

pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    async fn guild_channel(&self, channel_id: ChannelId) -> Result<GuildChannel> {
        channel_id
            .to_channel((&self.cache, self.http.as_ref()))
            .await
            .map_err(|e| platform_error("fetch channel", e))?
            .guild()
            .ok_or_else(|| Error::not_found(format!("guild channel {channel_id}")))
    }
}

/// Convert a serenity user into the platform-neutral author.
pub fn author_of(user: &User) -> Author {
    Author {
        id: user.id.to_string(),
        name: user.name.clone(),
        avatar_url: user.avatar_url(),
        bot: user.bot,
    }
}

pub fn permissions_for(capability: Capability) -> Permissions {
    match capability {
        Capability::ManageChannels => Permissions::MANAGE_CHANNELS,
        Capability::ManageMessages => Permissions::MANAGE_MESSAGES,
    }
}

/// Parse a snowflake; zero and non-numeric ids are not found.
fn snowflake(raw: &str, what: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .ok_or_else(|| Error::not_found(format!("{what} {raw}")))
}

fn nonzero(id: u64, what: &str) -> Result<u64> {
    if id == 0 {
        return Err(Error::not_found(format!("{what} 0")));
    }
    Ok(id)
}

/// Map an HTTP 403 to [`Error::Forbidden`] and a 404 to [`Error::NotFound`].
fn platform_error(context: &str, err: serenity::Error) -> Error {
    let status = match &err {
        serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()),
        _ => None,
    };
    match status {
        Some(403) => Error::forbidden(format!("{context}: {err}")),
        Some(404) => Error::not_found(format!("{context}: {err}")),
        _ => Error::external(context, err),
    }
}

/// Send-messages bits of an existing overwrite after allowing or denying it.
fn toggle_send(allow: Permissions, deny: Permissions, allowed: bool) -> (Permissions, Permissions) {
    let send = Permissions::SEND_MESSAGES;
    if allowed {
        (allow | send, deny - send)
    } else {
        (allow - send, deny | send)
    }
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn resolve_channel(&self, guild_id: u64, channel_id: &str) -> Result<ChannelRef> {
        let id = ChannelId::new(snowflake(channel_id, "channel")?);
        let channel = self.guild_channel(id).await?;
        if channel.guild_id.get() != guild_id {
            return Err(Error::not_found(format!("channel {channel_id} in this guild")));
        }
        Ok(ChannelRef {
            id: channel.id.to_string(),
            name: channel.name,
            guild_id: Some(guild_id),
        })
    }

    async fn fetch_message_author(&self, channel_id: &str, message_id: &str) -> Result<Author> {
        let channel = ChannelId::new(snowflake(channel_id, "channel")?);
        let message = MessageId::new(snowflake(message_id, "message")?);
        let fetched = channel
            .message((&self.cache, self.http.as_ref()), message)
            .await
            .map_err(|e| platform_error("fetch message", e))?;
        Ok(author_of(&fetched.author))
    }

    async fn has_capability(
        &self,
        guild_id: u64,
        subject: &Subject,
        capability: Capability,
    ) -> Result<bool> {
        let guild = GuildId::new(nonzero(guild_id, "guild")?);
        let user = match subject {
            Subject::Member(id) => UserId::new(snowflake(id, "member")?),
            Subject::Bot => self.cache.current_user().id,
        };
        let member = guild
            .member((&self.cache, self.http.as_ref()), user)
            .await
            .map_err(|e| platform_error("fetch member", e))?;

        let permissions = {
            let cached = self
                .cache
                .guild(guild)
                .ok_or_else(|| Error::unavailable(format!("guild {guild} not cached")))?;
            cached.member_permissions(&member)
        };
        let held = permissions.contains(permissions_for(capability));
        debug!(guild_id, %subject, %capability, held, "capability lookup");
        Ok(held)
    }

    async fn set_channel_send_permission(
        &self,
        guild_id: u64,
        channel_id: &str,
        allowed: bool,
        reason: &str,
    ) -> Result<()> {
        let channel = self
            .guild_channel(ChannelId::new(snowflake(channel_id, "channel")?))
            .await?;
        // The @everyone role shares the guild's id.
        let everyone = RoleId::new(nonzero(guild_id, "guild")?);
        let (allow, deny) = channel
            .permission_overwrites
            .iter()
            .find(|o| matches!(o.kind, PermissionOverwriteType::Role(id) if id == everyone))
            .map_or((Permissions::empty(), Permissions::empty()), |o| {
                (o.allow, o.deny)
            });
        let (allow, deny) = toggle_send(allow, deny, allowed);

        let body = serde_json::json!({
            "allow": allow.bits().to_string(),
            "deny": deny.bits().to_string(),
            "type": 0,
        });
        self.http
            .create_permission(channel.id, TargetId::from(everyone.get()), &body, Some(reason))
            .await
            .map_err(|e| platform_error("edit channel permissions", e))
    }
}
