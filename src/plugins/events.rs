//! Event plugin registry - fans transport notifications out to subscribers

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::context::AppContext;
use crate::domain::traits::Session;
use super::registry::{instantiate, PluginUnit};
use super::trait_def::{EventKind, EventPlugin, Plugin, TransportEvent};

#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventPlugin>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(units: &[PluginUnit<dyn EventPlugin>], disabled: &[String]) -> Self {
        let mut registry = Self::new();
        for plugin in instantiate("event", units, disabled) {
            registry.subscribe(plugin);
        }
        registry
    }

    pub fn subscribe(&mut self, plugin: Arc<dyn EventPlugin>) {
        tracing::debug!("Event plugin '{}' listens on '{}'", plugin.name(), plugin.trigger());
        self.handlers.entry(plugin.trigger()).or_default().push(plugin);
    }

    pub fn subscribers(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Run every subscriber of the event in registration order.
    ///
    /// A failing subscriber is logged and the rest still run.
    pub async fn emit(&self, session: &dyn Session, app: &AppContext, event: &TransportEvent) {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return;
        };

        for handler in handlers {
            if let Err(e) = handler.run(session, app, event).await {
                tracing::error!("Event plugin '{}' failed on '{}': {}", handler.name(), event.kind(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::{PluginError, PluginResult};
    use crate::application::services::ConfigStore;
    use crate::infrastructure::config::Config;
    use crate::infrastructure::storage::JsonStore;
    use crate::plugins::builtin::events::Presence;
    use crate::plugins::PluginRegistry;
    use crate::testing::MockSession;
    use async_trait::async_trait;

    struct Broken;

    impl Plugin for Broken {
        fn name(&self) -> &str {
            "broken"
        }
    }

    #[async_trait]
    impl EventPlugin for Broken {
        fn trigger(&self) -> EventKind {
            EventKind::Ready
        }

        async fn run(&self, _session: &dyn Session, _app: &AppContext, _event: &TransportEvent) -> PluginResult<()> {
            Err(PluginError::Execution {
                name: "broken".to_string(),
                reason: "no luck".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_stop_the_rest() {
        let mut events = EventRegistry::new();
        events.subscribe(Arc::new(Broken));
        events.subscribe(Arc::new(Presence));
        assert_eq!(events.subscribers(EventKind::Ready), 2);

        let store = ConfigStore::new(Arc::new(JsonStore::in_memory()));
        let app = AppContext::new(Config::default(), store, PluginRegistry::new(), EventRegistry::new());
        let session = MockSession::new();
        let ready = TransportEvent::Ready {
            bot: session.bot_info(),
            guild_count: 0,
        };

        events.emit(&session, &app, &ready).await;

        assert_eq!(session.activities(), vec!["!help".to_string()]);
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_a_no_op() {
        let store = ConfigStore::new(Arc::new(JsonStore::in_memory()));
        let app = AppContext::new(Config::default(), store, PluginRegistry::new(), EventRegistry::new());
        let session = MockSession::new();

        EventRegistry::new().emit(&session, &app, &TransportEvent::Resume).await;

        assert!(session.activities().is_empty());
    }
}
