//! Console adapter for development/testing
//!
//! Every stdin line becomes a guild message from the local user, who owns the
//! single pretend guild. Replies are printed to stdout.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::services::bootstrap::{Lifecycle, Transport};
use crate::domain::entities::{GuildId, InboundMessage, User};
use crate::domain::traits::{BotInfo, Session};

pub const CONSOLE_GUILD: &str = "console";
const CONSOLE_CHANNEL: &str = "stdin";
const CONSOLE_USER: &str = "local";

/// Console session for local development
pub struct ConsoleSession {
    info: BotInfo,
    next_id: AtomicU64,
}

impl ConsoleSession {
    pub fn new(bot_name: &str) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: bot_name.to_string(),
                tag: format!("{}#0000", bot_name),
            },
            next_id: AtomicU64::new(1),
        }
    }

    fn message_id(&self) -> String {
        format!("console-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap one typed line as a message from the guild owner
    pub fn inbound(&self, line: &str) -> InboundMessage {
        InboundMessage::new(self.message_id(), CONSOLE_CHANNEL, User::new(CONSOLE_USER, "you"), line)
            .in_guild(CONSOLE_GUILD, "Console")
            .with_guild_owner(CONSOLE_USER)
            .with_channel_name(CONSOLE_CHANNEL)
    }
}

#[async_trait]
impl Session for ConsoleSession {
    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok(self.message_id())
    }

    async fn delete_message(&self, _channel_id: &str, message_id: &str) -> Result<(), BotError> {
        tracing::debug!("Deleted console message {}", message_id);
        Ok(())
    }

    async fn set_activity(&self, text: &str) -> Result<(), BotError> {
        tracing::info!("Activity set to '{}'", text);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Runs until stdin closes or the user types `quit`
pub struct ConsoleTransport {
    bot_name: String,
}

impl ConsoleTransport {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self { bot_name: bot_name.into() }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn run(self: Box<Self>, lifecycle: Lifecycle) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");

        let console = Arc::new(ConsoleSession::new(&self.bot_name));
        let session: Arc<dyn Session> = console.clone();

        lifecycle
            .guild_joined(session.clone(), GuildId::from(CONSOLE_GUILD), "Console".to_string(), false)
            .await;
        lifecycle.ready(session.clone(), 1).await;

        println!("Type messages as a guild member, 'quit' to exit.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Transport(format!("stdin: {}", e)))?
        {
            let line = line.trim();
            if line == "quit" {
                break;
            }
            if line.is_empty() {
                continue;
            }
            let outcome = lifecycle.message(session.clone(), console.inbound(line)).await;
            tracing::debug!("{:?}", outcome);
        }

        tracing::info!("Console closed");
        Ok(())
    }
}
