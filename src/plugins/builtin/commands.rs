//! Built-in text commands

use async_trait::async_trait;
use serde_json::json;

use crate::application::errors::CommandError;
use crate::application::messaging::DispatchContext;
use crate::plugins::trait_def::{Command, Plugin};

/// Longest prefix a guild may configure
const MAX_PREFIX_LEN: usize = 5;

pub struct PingCommand;

impl Plugin for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Check that the bot is responsive"
    }
}

#[async_trait]
impl Command for PingCommand {
    async fn run(&self, ctx: &DispatchContext) -> Result<(), CommandError> {
        ctx.reply("Pong!").await?;
        Ok(())
    }
}

pub struct HelpCommand;

impl Plugin for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "List commands or show how to use one"
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn usage(&self) -> Option<&str> {
        Some("help [command]")
    }

    async fn run(&self, ctx: &DispatchContext) -> Result<(), CommandError> {
        let prefix = ctx.prefix();

        let text = match ctx.arg(0) {
            Some(name) => {
                let name = name.strip_prefix(prefix).unwrap_or(name);
                match ctx.app.commands.lookup(name) {
                    Some(cmd) => {
                        let mut help = format!("{}{} - {}", prefix, cmd.name(), cmd.description());
                        if let Some(usage) = cmd.usage() {
                            help.push_str(&format!("\nUsage: {}{}", prefix, usage));
                        }
                        help
                    }
                    None => format!("Command {}{} not found", prefix, name),
                }
            }
            None => {
                let mut help = "Available commands:\n".to_string();
                for cmd in ctx.app.commands.all() {
                    help.push_str(&format!("  {}{} - {}\n", prefix, cmd.name(), cmd.description()));
                }
                help
            }
        };

        ctx.reply(text.trim_end()).await?;
        Ok(())
    }
}

/// Shows or changes the guild's command prefix; changing it is reserved to the guild owner
pub struct PrefixCommand;

impl Plugin for PrefixCommand {
    fn name(&self) -> &str {
        "prefix"
    }

    fn description(&self) -> &str {
        "Show or change the command prefix of this guild"
    }
}

#[async_trait]
impl Command for PrefixCommand {
    fn usage(&self) -> Option<&str> {
        Some("prefix [new-prefix]")
    }

    async fn run(&self, ctx: &DispatchContext) -> Result<(), CommandError> {
        let Some(new_prefix) = ctx.arg(0) else {
            ctx.reply(&format!("Current prefix is `{}`", ctx.prefix())).await?;
            return Ok(());
        };

        if !ctx.message.author_owns_guild() {
            return Err(CommandError::PermissionDenied);
        }

        if ctx.args.len() > 1 || new_prefix.chars().count() > MAX_PREFIX_LEN {
            return Err(CommandError::InvalidArgs(format!(
                "prefix must be a single word of at most {} characters",
                MAX_PREFIX_LEN
            )));
        }

        let path = format!("{}/prefix", ctx.guild_id.config_path());
        ctx.app.store.set(&path, json!(new_prefix), true).await?;

        tracing::info!("Guild {} changed prefix to '{}'", ctx.guild_id, new_prefix);
        ctx.reply(&format!("Prefix set to `{}`", new_prefix)).await?;
        Ok(())
    }
}

pub struct UptimeCommand;

impl Plugin for UptimeCommand {
    fn name(&self) -> &str {
        "uptime"
    }

    fn description(&self) -> &str {
        "Show how long the bot has been running"
    }
}

#[async_trait]
impl Command for UptimeCommand {
    async fn run(&self, ctx: &DispatchContext) -> Result<(), CommandError> {
        let text = format!("Up for {}", format_duration(ctx.app.uptime()));
        ctx.reply(&text).await?;
        Ok(())
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (total / 86_400, total / 3_600 % 24, total / 60 % 60, total % 60);

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::AppContext;
    use crate::application::messaging::{CommandDispatcher, DispatchOutcome};
    use crate::application::services::ConfigStore;
    use crate::domain::entities::{InboundMessage, User};
    use crate::infrastructure::config::Config;
    use crate::infrastructure::storage::JsonStore;
    use crate::plugins::{EventRegistry, PluginRegistry};
    use crate::testing::MockSession;
    use std::sync::Arc;

    async fn dispatcher() -> (CommandDispatcher, Arc<AppContext>) {
        let mut commands = PluginRegistry::new();
        commands.register(Arc::new(PingCommand)).unwrap();
        commands.register(Arc::new(HelpCommand)).unwrap();
        commands.register(Arc::new(PrefixCommand)).unwrap();
        commands.register(Arc::new(UptimeCommand)).unwrap();

        let mut config = Config::default();
        config.bot.delete_delay_ms = 0;
        let store = ConfigStore::new(Arc::new(JsonStore::in_memory()));
        let app = Arc::new(AppContext::new(config, store, commands, EventRegistry::new()));
        (CommandDispatcher::new(app.clone()), app)
    }

    fn message(author: &str, content: &str) -> InboundMessage {
        InboundMessage::new("m1", "c1", User::new(author, "someone"), content)
            .in_guild("g1", "Rustaceans")
            .with_guild_owner("owner")
    }

    #[tokio::test]
    async fn test_ping_replies() {
        let (dispatcher, _) = dispatcher().await;
        let session = Arc::new(MockSession::new());

        dispatcher.handle(session.clone(), message("u1", "!ping")).await;
        assert_eq!(session.sent(), vec![("c1".to_string(), "Pong!".to_string())]);
    }

    #[tokio::test]
    async fn test_help_lists_commands_with_guild_prefix() {
        let (dispatcher, _) = dispatcher().await;
        let session = Arc::new(MockSession::new());

        dispatcher.handle(session.clone(), message("u1", "!help")).await;
        let text = &session.sent_texts()[0];
        assert!(text.starts_with("Available commands:"));
        assert!(text.contains("!ping - Check that the bot is responsive"));
        assert!(text.contains("!uptime"));

        dispatcher.handle(session.clone(), message("u1", "!help prefix")).await;
        assert_eq!(
            session.sent_texts()[1],
            "!prefix - Show or change the command prefix of this guild\nUsage: !prefix [new-prefix]"
        );

        dispatcher.handle(session.clone(), message("u1", "!help nope")).await;
        assert_eq!(session.sent_texts()[2], "Command !nope not found");
    }

    #[tokio::test]
    async fn test_owner_changes_prefix() {
        let (dispatcher, app) = dispatcher().await;
        let session = Arc::new(MockSession::new());

        let outcome = dispatcher.handle(session.clone(), message("owner", "!prefix ?")).await;
        assert_eq!(outcome, DispatchOutcome::Executed("prefix".to_string()));
        assert_eq!(session.sent_texts(), vec!["Prefix set to `?`"]);
        assert_eq!(app.store.get("/g1/prefix").await, Some(json!("?")));

        assert_eq!(
            dispatcher.handle(session.clone(), message("u1", "!ping")).await,
            DispatchOutcome::NotACommand
        );
        assert_eq!(
            dispatcher.handle(session.clone(), message("u1", "?ping")).await,
            DispatchOutcome::Executed("ping".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_owner_cannot_change_prefix() {
        let (dispatcher, app) = dispatcher().await;
        let session = Arc::new(MockSession::new());

        let outcome = dispatcher.handle(session.clone(), message("u1", "!prefix ?")).await;
        assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
        assert!(session.sent().is_empty());
        assert_eq!(app.store.get("/g1/prefix").await, Some(json!("!")));

        dispatcher.handle(session.clone(), message("u1", "!prefix")).await;
        assert_eq!(session.sent_texts(), vec!["Current prefix is `!`"]);
    }

    #[tokio::test]
    async fn test_overlong_prefix_rejected() {
        let (dispatcher, app) = dispatcher().await;
        let session = Arc::new(MockSession::new());

        let outcome = dispatcher.handle(session.clone(), message("owner", "!prefix abcdefg")).await;
        assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
        assert_eq!(app.store.get("/g1/prefix").await, Some(json!("!")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::seconds(3_725)), "1h 2m 5s");
        assert_eq!(format_duration(chrono::Duration::seconds(90_061)), "1d 1h 1m 1s");
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "0s");
    }
}
