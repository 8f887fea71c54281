use async_trait::async_trait;
use crate::application::errors::BotError;

/// Session trait - the live handle on the messaging platform that handlers act through
#[async_trait]
pub trait Session: Send + Sync {
    /// Send a text message to a channel, returning the new message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;

    /// Delete a message from a channel
    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), BotError>;

    /// Update the bot's displayed activity
    async fn set_activity(&self, text: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub tag: String,
}
