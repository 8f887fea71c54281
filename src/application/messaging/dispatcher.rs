//! Message dispatcher - Routes prefixed messages to command handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::context::AppContext;
use crate::domain::entities::InboundMessage;
use crate::domain::traits::Session;
use crate::plugins::Command;
use super::context::DispatchContext;
use super::parser::MessageParser;

/// Why a message was dropped before prefix resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    BotAuthor,
    DirectMessage,
}

/// What happened to one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ignored(IgnoreReason),
    NotACommand,
    UnknownCommand(String),
    Executed(String),
    Failed { command: String, error: String },
}

/// Message dispatcher - resolves the guild prefix, looks the command up and runs it
pub struct CommandDispatcher {
    app: Arc<AppContext>,
}

impl CommandDispatcher {
    pub fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    /// Process one inbound message.
    ///
    /// Nothing in here propagates: handler and deletion failures are logged and
    /// the next message is processed normally.
    pub async fn handle(&self, session: Arc<dyn Session>, message: InboundMessage) -> DispatchOutcome {
        if message.author.is_bot {
            return DispatchOutcome::Ignored(IgnoreReason::BotAuthor);
        }

        let Some(guild) = message.guild.clone() else {
            return DispatchOutcome::Ignored(IgnoreReason::DirectMessage);
        };

        let guild_config = self.app.guilds.resolve(&guild.id).await;

        let Some(parsed) = MessageParser::new(&guild_config.prefix).parse(&message.content) else {
            return DispatchOutcome::NotACommand;
        };

        let Some(command) = self.app.commands.lookup(&parsed.name) else {
            tracing::debug!("[{}] Unknown command '{}'", guild.name, parsed.name);
            return DispatchOutcome::UnknownCommand(parsed.name);
        };

        let ctx = DispatchContext {
            session,
            app: Arc::clone(&self.app),
            message,
            guild_id: guild.id.clone(),
            guild_config,
            command: parsed.name,
            args: parsed.args,
        };

        let ctx = Arc::new(ctx);

        // Own task so a panicking handler surfaces as a JoinError
        let run = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { command.run(&ctx).await })
        };

        let error = match run.await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) if e.is_panic() => Some("handler panicked".to_string()),
            Err(e) => Some(e.to_string()),
        };

        let outcome = match error {
            None => DispatchOutcome::Executed(ctx.command.clone()),
            Some(error) => {
                tracing::error!(
                    guild = %guild.id,
                    channel = %ctx.message.channel_id,
                    user = %ctx.message.author.id,
                    command = %ctx.command,
                    "Command '{}' failed: {}",
                    ctx.command,
                    error
                );
                DispatchOutcome::Failed {
                    command: ctx.command.clone(),
                    error,
                }
            }
        };

        self.clean_up(&ctx, &guild.name).await;
        outcome
    }

    /// Delete the triggering message after the grace delay, then write the audit line
    async fn clean_up(&self, ctx: &DispatchContext, guild_name: &str) {
        let bot = &self.app.config.bot;

        if bot.delete_trigger {
            if bot.delete_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(bot.delete_delay_ms)).await;
            }
            if let Err(e) = ctx
                .session
                .delete_message(&ctx.message.channel_id, &ctx.message.id)
                .await
            {
                tracing::warn!("Could not delete command message {}: {}", ctx.message.id, e);
            }
        }

        tracing::info!(
            target: "audit",
            "{} executed command '{}{}' in channel '{}' on guild '{}' with following arguments: '{}'",
            ctx.message.author.tag(),
            ctx.prefix(),
            ctx.command,
            ctx.message.channel_label(),
            guild_name,
            ctx.args.join(",")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::CommandError;
    use crate::application::services::ConfigStore;
    use crate::domain::entities::User;
    use crate::infrastructure::config::Config;
    use crate::infrastructure::storage::JsonStore;
    use crate::plugins::{Command, EventRegistry, Plugin, PluginRegistry};
    use crate::testing::MockSession;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records the arguments of every invocation
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<String>>>,
    }

    struct RecordingCommand(Arc<Recorder>);

    impl Plugin for RecordingCommand {
        fn name(&self) -> &str {
            "ban"
        }
    }

    #[async_trait]
    impl Command for RecordingCommand {
        async fn run(&self, ctx: &DispatchContext) -> Result<(), CommandError> {
            self.0.calls.lock().unwrap().push(ctx.args.clone());
            Ok(())
        }
    }

    struct Panicking;

    impl Plugin for Panicking {
        fn name(&self) -> &str {
            "panic"
        }
    }

    #[async_trait]
    impl Command for Panicking {
        async fn run(&self, _ctx: &DispatchContext) -> Result<(), CommandError> {
            panic!("handler bug");
        }
    }

    struct Exploding;

    impl Plugin for Exploding {
        fn name(&self) -> &str {
            "explode"
        }
    }

    #[async_trait]
    impl Command for Exploding {
        async fn run(&self, _ctx: &DispatchContext) -> Result<(), CommandError> {
            Err(CommandError::ExecutionFailed("boom".to_string()))
        }
    }

    async fn setup() -> (CommandDispatcher, Arc<Recorder>, Arc<MockSession>, Arc<AppContext>) {
        let recorder = Arc::new(Recorder::default());
        let mut commands = PluginRegistry::new();
        commands.register(Arc::new(RecordingCommand(recorder.clone()))).unwrap();
        commands.register(Arc::new(Exploding)).unwrap();
        commands.register(Arc::new(Panicking)).unwrap();

        let mut config = Config::default();
        config.bot.delete_delay_ms = 0;

        let store = ConfigStore::new(Arc::new(JsonStore::in_memory()));
        store.set("/default", json!({"prefix": "!"}), true).await.unwrap();

        let app = Arc::new(AppContext::new(config, store, commands, EventRegistry::new()));
        (CommandDispatcher::new(app.clone()), recorder, Arc::new(MockSession::new()), app)
    }

    fn guild_message(content: &str) -> InboundMessage {
        InboundMessage::new("m1", "c1", User::new("u1", "ferris"), content)
            .in_guild("g1", "Rustaceans")
            .with_channel_name("general")
    }

    #[tokio::test]
    async fn test_dispatches_with_args() {
        let (dispatcher, recorder, session, _app) = setup().await;

        let outcome = dispatcher.handle(session.clone(), guild_message("!ban userX 10")).await;

        assert_eq!(outcome, DispatchOutcome::Executed("ban".to_string()));
        assert_eq!(*recorder.calls.lock().unwrap(), vec![vec!["userX".to_string(), "10".to_string()]]);
        assert_eq!(session.deleted(), vec![("c1".to_string(), "m1".to_string())]);
    }

    #[tokio::test]
    async fn test_bot_and_direct_messages_are_ignored() {
        let (dispatcher, recorder, session, app) = setup().await;

        let from_bot = InboundMessage::new("m2", "c1", User::new("b1", "bot").bot(), "!ban x")
            .in_guild("g1", "Rustaceans");
        let direct = InboundMessage::new("m3", "dm", User::new("u1", "ferris"), "!ban x");

        assert_eq!(
            dispatcher.handle(session.clone(), from_bot).await,
            DispatchOutcome::Ignored(IgnoreReason::BotAuthor)
        );
        assert_eq!(
            dispatcher.handle(session.clone(), direct).await,
            DispatchOutcome::Ignored(IgnoreReason::DirectMessage)
        );
        assert!(recorder.calls.lock().unwrap().is_empty());
        assert!(session.deleted().is_empty());
        // Ignored before prefix resolution, so nothing was seeded
        assert_eq!(app.store.get("/g1").await, None);
    }

    #[tokio::test]
    async fn test_first_message_seeds_guild() {
        let (dispatcher, _recorder, session, app) = setup().await;

        let outcome = dispatcher.handle(session, guild_message("hello there")).await;

        assert_eq!(outcome, DispatchOutcome::NotACommand);
        assert_eq!(app.store.get("/g1").await, Some(json!({"prefix": "!"})));
    }

    #[tokio::test]
    async fn test_unknown_command_is_silent() {
        let (dispatcher, _recorder, session, _app) = setup().await;

        let outcome = dispatcher.handle(session.clone(), guild_message("!kick someone")).await;

        assert_eq!(outcome, DispatchOutcome::UnknownCommand("kick".to_string()));
        assert!(session.sent().is_empty());
        assert!(session.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_block_next_message() {
        let (dispatcher, recorder, session, _app) = setup().await;

        let failed = dispatcher.handle(session.clone(), guild_message("!explode")).await;
        assert!(matches!(failed, DispatchOutcome::Failed { ref command, .. } if command == "explode"));

        let next = dispatcher.handle(session.clone(), guild_message("!ban later")).await;
        assert_eq!(next, DispatchOutcome::Executed("ban".to_string()));
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let (dispatcher, recorder, session, _app) = setup().await;

        let failed = dispatcher.handle(session.clone(), guild_message("!panic")).await;
        assert_eq!(
            failed,
            DispatchOutcome::Failed {
                command: "panic".to_string(),
                error: "handler panicked".to_string(),
            }
        );
        // Clean-up still ran for the panicked command
        assert_eq!(session.deleted().len(), 1);

        let next = dispatcher.handle(session.clone(), guild_message("!ban after")).await;
        assert_eq!(next, DispatchOutcome::Executed("ban".to_string()));
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_guild_prefix_is_honored() {
        let (dispatcher, recorder, session, app) = setup().await;
        app.store.set("/g1", json!({"prefix": "$"}), true).await.unwrap();

        assert_eq!(
            dispatcher.handle(session.clone(), guild_message("!ban x")).await,
            DispatchOutcome::NotACommand
        );
        assert_eq!(
            dispatcher.handle(session.clone(), guild_message("$ban x")).await,
            DispatchOutcome::Executed("ban".to_string())
        );
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deletion_failure_is_not_a_dispatch_failure() {
        let (dispatcher, _recorder, _session, _app) = setup().await;
        let session = Arc::new(MockSession::new().failing_deletes());

        let outcome = dispatcher.handle(session.clone(), guild_message("!ban x")).await;
        assert_eq!(outcome, DispatchOutcome::Executed("ban".to_string()));
    }

    #[tokio::test]
    async fn test_trigger_kept_when_deletion_disabled() {
        let recorder = Arc::new(Recorder::default());
        let mut commands = PluginRegistry::new();
        commands.register(Arc::new(RecordingCommand(recorder))).unwrap();
        let mut config = Config::default();
        config.bot.delete_trigger = false;
        let store = ConfigStore::new(Arc::new(JsonStore::in_memory()));
        let app = Arc::new(AppContext::new(config, store, commands, EventRegistry::new()));
        let dispatcher = CommandDispatcher::new(app);
        let session = Arc::new(MockSession::new());

        let outcome = dispatcher.handle(session.clone(), guild_message("!ban x")).await;
        assert_eq!(outcome, DispatchOutcome::Executed("ban".to_string()));
        assert!(session.deleted().is_empty());
    }
}
