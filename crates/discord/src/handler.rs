//! Discord event handler for serenity.
//!
//! Converts gateway events into router calls and delivers the replies.

use std::sync::{Arc, OnceLock};

use {
    serenity::{
        all::{
            ChannelId, Context, EventHandler, GatewayIntents, GuildId, Message, MessageId,
            MessageUpdateEvent, Ready,
        },
        async_trait,
    },
    tracing::{debug, info},
};

use {
    warden_channels::{ChannelRef, DeletedMessage, Glyphs, InboundMessage, ReplyReference},
    warden_config::WardenConfig,
    warden_registry::EventRouter,
    warden_store::DocumentStore,
};

use crate::{
    outbound,
    platform::{SerenityPlatform, author_of},
    recent::RecentMessages,
};

/// Handler for Discord gateway events.
pub struct WardenHandler {
    config: WardenConfig,
    store: Arc<dyn DocumentStore>,
    glyphs: Glyphs,
    recent: RecentMessages,
    /// Built on the first event, once serenity's HTTP client and cache exist.
    router: OnceLock<EventRouter>,
}

impl WardenHandler {
    pub fn new(config: WardenConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            glyphs: Glyphs::new(config.emojis.0.clone()),
            recent: RecentMessages::new(config.discord.message_cache_size),
            router: OnceLock::new(),
            config,
            store,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    fn router(&self, ctx: &Context) -> &EventRouter {
        self.router.get_or_init(|| {
            let platform = SerenityPlatform::new(Arc::clone(&ctx.http), Arc::clone(&ctx.cache));
            EventRouter::new(Arc::clone(&self.store), Arc::new(platform), &self.config)
        })
    }
}

fn channel_name(ctx: &Context, guild_id: Option<GuildId>, channel_id: ChannelId) -> String {
    guild_id
        .and_then(|g| ctx.cache.guild(g))
        .and_then(|guild| guild.channels.get(&channel_id).map(|c| c.name.clone()))
        .unwrap_or_else(|| channel_id.to_string())
}

fn inbound(ctx: &Context, msg: &Message) -> InboundMessage {
    let reply_to = msg.message_reference.as_ref().and_then(|reference| {
        Some(ReplyReference {
            channel_id: reference.channel_id.to_string(),
            message_id: reference.message_id?.to_string(),
            author_id: msg
                .referenced_message
                .as_ref()
                .map(|referenced| referenced.author.id.to_string()),
        })
    });

    InboundMessage {
        id: msg.id.to_string(),
        channel: ChannelRef {
            id: msg.channel_id.to_string(),
            name: channel_name(ctx, msg.guild_id, msg.channel_id),
            guild_id: msg.guild_id.map(GuildId::get),
        },
        author: author_of(&msg.author),
        content: msg.content.clone(),
        mentions: msg.mentions.iter().map(|u| u.id.to_string()).collect(),
        reply_to,
    }
}

fn deleted(msg: &Message) -> DeletedMessage {
    DeletedMessage {
        channel_id: msg.channel_id.to_string(),
        author: author_of(&msg.author),
        content: msg.content.clone(),
    }
}

#[async_trait]
impl EventHandler for WardenHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            prefix = %self.router(&ctx).prefix(),
            "discord bot ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent loops
        if msg.author.bot {
            return;
        }

        if !msg.content.is_empty() {
            self.recent.remember(msg.id.get(), deleted(&msg));
        }

        let event = inbound(&ctx, &msg);
        let replies = self.router(&ctx).on_message(&event).await;
        if !replies.is_empty() {
            outbound::deliver(&ctx.http, &msg, &replies, &self.glyphs).await;
        }
    }

    async fn message_update(
        &self,
        _ctx: Context,
        _old_if_available: Option<Message>,
        _new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        if let Some(content) = event.content {
            self.recent.edit(event.id.get(), content);
        }
    }

    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        let message = self.recent.take(deleted_message_id.get()).or_else(|| {
            ctx.cache
                .message(channel_id, deleted_message_id)
                .map(|cached| deleted(&cached))
        });
        let Some(message) = message else {
            debug!(%channel_id, message_id = %deleted_message_id, "deleted message was not seen");
            return;
        };
        self.router(&ctx).on_message_delete(&message).await;
    }
}
