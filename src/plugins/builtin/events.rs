//! Built-in event plugins

use async_trait::async_trait;

use crate::application::context::AppContext;
use crate::application::errors::{PluginError, PluginResult};
use crate::domain::traits::Session;
use crate::plugins::trait_def::{EventKind, EventPlugin, Plugin, TransportEvent};

pub struct ReadyLog;

impl Plugin for ReadyLog {
    fn name(&self) -> &str {
        "ready-log"
    }
}

#[async_trait]
impl EventPlugin for ReadyLog {
    fn trigger(&self) -> EventKind {
        EventKind::Ready
    }

    async fn run(&self, _session: &dyn Session, _app: &AppContext, event: &TransportEvent) -> PluginResult<()> {
        tracing::info!("Event '{}' triggered!", event.kind());
        Ok(())
    }
}

/// Shows a help hint as the bot's activity once connected
pub struct Presence;

impl Plugin for Presence {
    fn name(&self) -> &str {
        "presence"
    }

    fn description(&self) -> &str {
        "Advertise the help command in the bot's status"
    }
}

#[async_trait]
impl EventPlugin for Presence {
    fn trigger(&self) -> EventKind {
        EventKind::Ready
    }

    async fn run(&self, session: &dyn Session, app: &AppContext, _event: &TransportEvent) -> PluginResult<()> {
        let prefix = app.guilds.template().await["prefix"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| app.config.bot.default_prefix.clone());

        session
            .set_activity(&format!("{}help", prefix))
            .await
            .map_err(|e| PluginError::Execution {
                name: self.name().to_string(),
                reason: e.to_string(),
            })
    }
}
