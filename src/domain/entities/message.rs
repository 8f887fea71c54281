use super::{GuildId, User};
use chrono::{DateTime, Utc};

/// Guild a message was posted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRef {
    pub id: GuildId,
    pub name: String,
    pub owner_id: Option<String>,
}

/// Represents an incoming message from the transport
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub channel_id: String,
    pub channel_name: Option<String>,
    /// `None` for direct/private messages
    pub guild: Option<GuildRef>,
    pub author: User,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        author: User,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            channel_name: None,
            guild: None,
            author,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn in_guild(mut self, id: impl Into<GuildId>, name: impl Into<String>) -> Self {
        self.guild = Some(GuildRef {
            id: id.into(),
            name: name.into(),
            owner_id: None,
        });
        self
    }

    /// Record the guild owner; no effect on direct messages
    pub fn with_guild_owner(mut self, owner_id: impl Into<String>) -> Self {
        if let Some(guild) = self.guild.as_mut() {
            guild.owner_id = Some(owner_id.into());
        }
        self
    }

    /// Whether the author owns the guild the message was posted in
    pub fn author_owns_guild(&self) -> bool {
        self.guild
            .as_ref()
            .and_then(|g| g.owner_id.as_deref())
            .is_some_and(|owner| owner == self.author.id)
    }

    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = Some(name.into());
        self
    }

    /// Channel name for log lines, falling back to the id
    pub fn channel_label(&self) -> &str {
        self.channel_name.as_deref().unwrap_or(&self.channel_id)
    }
}
