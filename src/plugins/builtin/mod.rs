//! Plugins compiled into the binary

pub mod commands;
pub mod events;
pub mod scripts;

use std::sync::Arc;

use super::registry::PluginCatalog;
use super::trait_def::{Command, EventPlugin, Script};

/// The catalog the bot loads at startup
pub fn catalog() -> PluginCatalog {
    PluginCatalog::new()
        .command(|| Ok(Arc::new(commands::PingCommand) as Arc<dyn Command>))
        .command(|| Ok(Arc::new(commands::HelpCommand) as Arc<dyn Command>))
        .command(|| Ok(Arc::new(commands::PrefixCommand) as Arc<dyn Command>))
        .command(|| Ok(Arc::new(commands::UptimeCommand) as Arc<dyn Command>))
        .script(|| Ok(Arc::new(scripts::StartupSummary) as Arc<dyn Script>))
        .event(|| Ok(Arc::new(events::ReadyLog) as Arc<dyn EventPlugin>))
        .event(|| Ok(Arc::new(events::Presence) as Arc<dyn EventPlugin>))
}
