//! Plugin trait definitions

use async_trait::async_trait;
use std::fmt;

use crate::application::context::AppContext;
use crate::application::errors::{CommandError, PluginResult};
use crate::application::messaging::DispatchContext;
use crate::domain::entities::GuildId;
use crate::domain::traits::{BotInfo, Session};

/// Core plugin trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Unique identifier for the plugin
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }
}

/// A prefixed text command
#[async_trait]
pub trait Command: Plugin {
    /// Usage line shown by `help`, without the prefix
    fn usage(&self) -> Option<&str> {
        None
    }

    /// Execute the command for one inbound message
    async fn run(&self, ctx: &DispatchContext) -> Result<(), CommandError>;
}

/// Runs exactly once at startup, after commands are loaded
#[async_trait]
pub trait Script: Plugin {
    async fn run(&self, app: &AppContext) -> PluginResult<()>;
}

/// Reacts to a transport notification
#[async_trait]
pub trait EventPlugin: Plugin {
    fn trigger(&self) -> EventKind;

    async fn run(&self, session: &dyn Session, app: &AppContext, event: &TransportEvent) -> PluginResult<()>;
}

/// Transport notifications event plugins can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    GuildCreate,
    Resume,
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Ready => "ready",
            EventKind::GuildCreate => "guild-create",
            EventKind::Resume => "resume",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a transport notification
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Ready { bot: BotInfo, guild_count: usize },
    GuildCreate { guild_id: GuildId, name: String, is_new: bool },
    Resume,
}

impl TransportEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TransportEvent::Ready { .. } => EventKind::Ready,
            TransportEvent::GuildCreate { .. } => EventKind::GuildCreate,
            TransportEvent::Resume => EventKind::Resume,
        }
    }
}
