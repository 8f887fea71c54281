//! Application context shared by every component

use chrono::{DateTime, Utc};

use crate::application::services::{ConfigStore, GuildConfigResolver};
use crate::infrastructure::config::Config;
use crate::plugins::{EventRegistry, PluginRegistry};

/// Built once at startup and handed around behind an `Arc`
pub struct AppContext {
    pub config: Config,
    pub store: ConfigStore,
    pub guilds: GuildConfigResolver,
    pub commands: PluginRegistry,
    pub events: EventRegistry,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(
        config: Config,
        store: ConfigStore,
        commands: PluginRegistry,
        events: EventRegistry,
    ) -> Self {
        let guilds = GuildConfigResolver::new(store.clone(), config.fallback_guild());
        Self {
            config,
            store,
            guilds,
            commands,
            events,
            started_at: Utc::now(),
        }
    }

    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}
