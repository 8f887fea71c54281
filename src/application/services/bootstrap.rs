//! Startup sequencing and transport lifecycle hooks

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::application::context::AppContext;
use crate::application::errors::BotError;
use crate::application::messaging::{CommandDispatcher, DispatchOutcome};
use crate::domain::entities::{GuildId, InboundMessage};
use crate::domain::traits::{DocumentStore, Session};
use crate::infrastructure::config::Config;
use crate::infrastructure::http::HttpServer;
use crate::infrastructure::storage::JsonStore;
use crate::plugins::{load_scripts, EventRegistry, Plugin, PluginCatalog, PluginRegistry, TransportEvent};
use super::config_store::ConfigStore;

/// A connection to the messaging platform.
///
/// `run` keeps the session alive and reports platform notifications through
/// the given [`Lifecycle`]; it returns when the session ends.
#[async_trait]
pub trait Transport: Send {
    async fn run(self: Box<Self>, lifecycle: Lifecycle) -> Result<(), BotError>;
}

/// What a transport calls into when the platform notifies it
#[derive(Clone)]
pub struct Lifecycle {
    app: Arc<AppContext>,
    dispatcher: Arc<CommandDispatcher>,
    ready: Arc<Notify>,
}

impl Lifecycle {
    pub fn new(app: Arc<AppContext>, ready: Arc<Notify>) -> Self {
        let dispatcher = Arc::new(CommandDispatcher::new(Arc::clone(&app)));
        Self { app, dispatcher, ready }
    }

    pub fn app(&self) -> &Arc<AppContext> {
        &self.app
    }

    /// Session is connected; unblocks the HTTP listener on first call
    pub async fn ready(&self, session: Arc<dyn Session>, guild_count: usize) {
        let bot = session.bot_info();
        tracing::info!("{} connected to {} guild(s).", bot.tag, guild_count);

        let event = TransportEvent::Ready { bot, guild_count };
        self.app.events.emit(session.as_ref(), &self.app, &event).await;
        self.ready.notify_one();
    }

    pub async fn resumed(&self, session: Arc<dyn Session>) {
        tracing::info!("Session resumed");
        self.app
            .events
            .emit(session.as_ref(), &self.app, &TransportEvent::Resume)
            .await;
    }

    /// Seed the guild's configuration before anything else from it is handled
    pub async fn guild_joined(&self, session: Arc<dyn Session>, guild_id: GuildId, name: String, is_new: bool) {
        if is_new {
            tracing::info!("Joined new guild: {}!", name);
        }

        self.app.guilds.provision(&guild_id).await;

        let event = TransportEvent::GuildCreate { guild_id, name, is_new };
        self.app.events.emit(session.as_ref(), &self.app, &event).await;
    }

    pub async fn message(&self, session: Arc<dyn Session>, message: InboundMessage) -> DispatchOutcome {
        self.dispatcher.handle(session, message).await
    }
}

/// Orders startup: plugins, scripts, transport, then the HTTP listener
pub struct BootstrapSequencer {
    config: Config,
    catalog: PluginCatalog,
}

impl BootstrapSequencer {
    pub fn new(config: Config, catalog: PluginCatalog) -> Self {
        Self { config, catalog }
    }

    /// Open the configured store and build the application context
    pub async fn prepare(self) -> Result<Arc<AppContext>, BotError> {
        let store = JsonStore::open(&self.config.storage.path, self.config.storage.pretty).await?;
        tracing::info!("Database opened at {}", self.config.storage.path.display());
        self.prepare_with_store(Arc::new(store)).await
    }

    /// Build the application context on top of `store`: seed the template,
    /// load commands and events, then run every startup script once
    pub async fn prepare_with_store(self, store: Arc<dyn DocumentStore>) -> Result<Arc<AppContext>, BotError> {
        let disabled = &self.config.plugins.disabled;
        let store = ConfigStore::new(store);

        let commands = PluginRegistry::load_commands(&self.catalog.commands, disabled);
        let events = EventRegistry::load(&self.catalog.events, disabled);
        let scripts = load_scripts(&self.catalog.scripts, disabled);

        let app = Arc::new(AppContext::new(self.config, store, commands, events));
        app.guilds.seed_template().await?;

        for script in scripts {
            if let Err(e) = script.run(&app).await {
                tracing::error!("Script '{}' failed: {}", script.name(), e);
            }
        }

        Ok(app)
    }

    /// Prepare, connect and serve until the transport or the HTTP server stops
    pub async fn start(self, transport: Box<dyn Transport>) -> Result<(), BotError> {
        let app = self.prepare().await?;
        Self::run(app, transport).await
    }

    pub async fn run(app: Arc<AppContext>, transport: Box<dyn Transport>) -> Result<(), BotError> {
        let ready = Arc::new(Notify::new());
        let lifecycle = Lifecycle::new(Arc::clone(&app), Arc::clone(&ready));

        let mut session = tokio::spawn(transport.run(lifecycle));

        tokio::select! {
            _ = ready.notified() => {}
            result = &mut session => return Self::flatten(result),
        }

        let server = HttpServer::bind(&app.config.http).await?;

        tokio::select! {
            result = &mut session => Self::flatten(result),
            result = server.serve() => result,
        }
    }

    fn flatten(result: Result<Result<(), BotError>, tokio::task::JoinError>) -> Result<(), BotError> {
        result.map_err(|e| BotError::Internal(format!("Transport task failed: {}", e)))?
    }
}
