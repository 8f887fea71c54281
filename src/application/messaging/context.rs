//! Per-message dispatch context

use std::sync::Arc;

use crate::application::context::AppContext;
use crate::application::errors::BotError;
use crate::domain::entities::{GuildConfig, GuildId, InboundMessage};
use crate::domain::traits::Session;

/// Everything a command sees while handling one message
pub struct DispatchContext {
    pub session: Arc<dyn Session>,
    pub app: Arc<AppContext>,
    pub message: InboundMessage,
    pub guild_id: GuildId,
    pub guild_config: GuildConfig,
    /// Command token with the prefix stripped
    pub command: String,
    pub args: Vec<String>,
}

impl DispatchContext {
    /// Send `text` to the channel the command came from
    pub async fn reply(&self, text: &str) -> Result<String, BotError> {
        self.session.send_message(&self.message.channel_id, text).await
    }

    pub fn prefix(&self) -> &str {
        &self.guild_config.prefix
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}
