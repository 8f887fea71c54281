//! Discord adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    ActivityData, ChannelId, Context, EventHandler, GatewayIntents, Guild, Message, MessageId,
    Ready, ResumedEvent,
};
use serenity::gateway::GatewayError;
use std::sync::Arc;
use tracing::info;

use crate::application::errors::BotError;
use crate::application::services::bootstrap::{Lifecycle, Transport};
use crate::domain::entities::{GuildId, InboundMessage, User};
use crate::domain::traits::{BotInfo, Session};

/// Gateway intents the bot needs to read guild commands
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Parse a snowflake kept as a string in the domain layer
fn snowflake(kind: &str, raw: &str) -> Result<u64, BotError> {
    match raw.parse::<u64>() {
        Ok(id) if id != 0 && id != u64::MAX => Ok(id),
        _ => Err(BotError::Parse(format!("invalid {} id '{}'", kind, raw))),
    }
}

/// A rejected token is an auth failure, anything else ends the transport
fn client_error(err: serenity::Error) -> BotError {
    match err {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => {
            BotError::Auth("Discord rejected the bot token".to_string())
        }
        other => BotError::Transport(format!("Discord client stopped: {}", other)),
    }
}

/// Session handle backed by the serenity context of the current event
pub struct DiscordSession {
    ctx: Context,
    info: BotInfo,
}

impl DiscordSession {
    pub fn new(ctx: Context) -> Self {
        let info = {
            let user = ctx.cache.current_user();
            BotInfo {
                id: user.id.to_string(),
                name: user.name.clone(),
                tag: user.tag(),
            }
        };
        Self { ctx, info }
    }

    fn from_ready(ctx: Context, ready: &Ready) -> Self {
        let info = BotInfo {
            id: ready.user.id.to_string(),
            name: ready.user.name.clone(),
            tag: ready.user.tag(),
        };
        Self { ctx, info }
    }
}

#[async_trait]
impl Session for DiscordSession {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let channel = ChannelId::new(snowflake("channel", channel_id)?);
        let sent = channel
            .say(&self.ctx, text)
            .await
            .map_err(|e| BotError::Network(format!("Discord send: {}", e)))?;
        Ok(sent.id.to_string())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), BotError> {
        let channel = ChannelId::new(snowflake("channel", channel_id)?);
        let message = MessageId::new(snowflake("message", message_id)?);
        channel
            .delete_message(&self.ctx, message)
            .await
            .map_err(|e| BotError::PermissionDenied(format!("Discord delete: {}", e)))
    }

    async fn set_activity(&self, text: &str) -> Result<(), BotError> {
        self.ctx.set_activity(Some(ActivityData::playing(text)));
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Convert a serenity message, filling guild and channel names from the cache
fn inbound_message(ctx: &Context, msg: &Message) -> InboundMessage {
    let mut author = User::new(msg.author.id.to_string(), msg.author.name.clone());
    if let Some(discriminator) = msg.author.discriminator {
        author = author.with_discriminator(discriminator.get());
    }
    if msg.author.bot {
        author = author.bot();
    }

    let mut inbound = InboundMessage::new(
        msg.id.to_string(),
        msg.channel_id.to_string(),
        author,
        msg.content.clone(),
    );
    inbound.timestamp = DateTime::<Utc>::from_timestamp(msg.timestamp.unix_timestamp(), 0)
        .unwrap_or_else(Utc::now);

    if let Some(guild_id) = msg.guild_id {
        let cached = ctx.cache.guild(guild_id).map(|guild| {
            (
                guild.name.clone(),
                guild.owner_id.to_string(),
                guild.channels.get(&msg.channel_id).map(|c| c.name.clone()),
            )
        });

        match cached {
            Some((name, owner, channel)) => {
                inbound = inbound.in_guild(guild_id.get(), name).with_guild_owner(owner);
                if let Some(channel) = channel {
                    inbound = inbound.with_channel_name(channel);
                }
            }
            None => inbound = inbound.in_guild(guild_id.get(), guild_id.to_string()),
        }
    }

    inbound
}

/// Serenity event handler forwarding into the bot lifecycle
pub struct Handler {
    lifecycle: Lifecycle,
}

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = inbound_message(&ctx, &msg);
        let session = Arc::new(DiscordSession::new(ctx));
        self.lifecycle.message(session, inbound).await;
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        let session = Arc::new(DiscordSession::new(ctx));
        self.lifecycle
            .guild_joined(session, GuildId::from(guild.id.get()), guild.name.clone(), is_new.unwrap_or(false))
            .await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        let guild_count = ready.guilds.len();
        let session = Arc::new(DiscordSession::from_ready(ctx, &ready));
        self.lifecycle.ready(session, guild_count).await;
    }

    async fn resume(&self, ctx: Context, _event: ResumedEvent) {
        let session = Arc::new(DiscordSession::new(ctx));
        self.lifecycle.resumed(session).await;
    }
}

/// Gateway connection authenticated with the bot token
pub struct DiscordTransport {
    token: String,
}

impl DiscordTransport {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl Transport for DiscordTransport {
    async fn run(self: Box<Self>, lifecycle: Lifecycle) -> Result<(), BotError> {
        let handler = Handler { lifecycle };

        let mut client = serenity::Client::builder(&self.token, required_intents())
            .event_handler(handler)
            .await
            .map_err(|e| BotError::Transport(format!("Failed to build Discord client: {}", e)))?;

        info!("Connecting to Discord");

        client.start().await.map_err(client_error)
    }
}
