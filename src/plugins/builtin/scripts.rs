//! Built-in startup scripts

use async_trait::async_trait;

use crate::application::context::AppContext;
use crate::application::errors::PluginResult;
use crate::domain::entities::DEFAULT_TEMPLATE_KEY;
use crate::plugins::trait_def::{Plugin, Script};

/// Logs what the bot starts with
pub struct StartupSummary;

impl Plugin for StartupSummary {
    fn name(&self) -> &str {
        "startup-summary"
    }

    fn description(&self) -> &str {
        "Log the loaded commands and the number of configured guilds"
    }
}

#[async_trait]
impl Script for StartupSummary {
    async fn run(&self, app: &AppContext) -> PluginResult<()> {
        let guilds = app
            .store
            .keys()
            .await
            .into_iter()
            .filter(|k| k != DEFAULT_TEMPLATE_KEY)
            .count();

        tracing::info!(
            "{} starting with {} command(s) [{}], {} guild(s) configured",
            app.config.bot.name,
            app.commands.len(),
            app.commands.names().join(", "),
            guilds
        );
        Ok(())
    }
}
