//! Plugin registry - Builds the command table and startup script list from a catalog

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::{PluginError, PluginResult};
use super::trait_def::{Command, EventPlugin, Plugin, Script};

type Factory<T> = Box<dyn Fn() -> PluginResult<Arc<T>> + Send + Sync>;

/// One loadable plugin unit: a factory producing the plugin instance
pub struct PluginUnit<T: ?Sized> {
    factory: Factory<T>,
}

impl<T: ?Sized> PluginUnit<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> PluginResult<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }

    fn build(&self) -> PluginResult<Arc<T>> {
        (self.factory)()
    }
}

/// Every plugin unit known to the binary, grouped by kind
#[derive(Default)]
pub struct PluginCatalog {
    pub commands: Vec<PluginUnit<dyn Command>>,
    pub scripts: Vec<PluginUnit<dyn Script>>,
    pub events: Vec<PluginUnit<dyn EventPlugin>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> PluginResult<Arc<dyn Command>> + Send + Sync + 'static,
    {
        self.commands.push(PluginUnit::new(factory));
        self
    }

    pub fn script<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> PluginResult<Arc<dyn Script>> + Send + Sync + 'static,
    {
        self.scripts.push(PluginUnit::new(factory));
        self
    }

    pub fn event<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> PluginResult<Arc<dyn EventPlugin>> + Send + Sync + 'static,
    {
        self.events.push(PluginUnit::new(factory));
        self
    }
}

/// Build every unit, skipping disabled ones and isolating failures
pub(crate) fn instantiate<T>(kind: &str, units: &[PluginUnit<T>], disabled: &[String]) -> Vec<Arc<T>>
where
    T: Plugin + ?Sized,
{
    let mut loaded = Vec::new();

    for unit in units {
        match unit.build() {
            Ok(plugin) if disabled.iter().any(|d| d == plugin.name()) => {
                tracing::debug!("Skipping disabled {} '{}'", kind, plugin.name());
            }
            Ok(plugin) => loaded.push(plugin),
            Err(e) => tracing::error!("Failed to load {}: {}", kind, e),
        }
    }

    if loaded.is_empty() {
        tracing::warn!("No {} plugins loaded, continuing without any", kind);
    }

    loaded
}

/// Registry for the loaded commands; read-only once startup is done
#[derive(Default)]
pub struct PluginRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all command units, keeping the first of any duplicated name
    pub fn load_commands(units: &[PluginUnit<dyn Command>], disabled: &[String]) -> Self {
        let mut registry = Self::new();

        for command in instantiate("command", units, disabled) {
            if let Err(e) = registry.register(command) {
                tracing::error!("Failed to load command: {}", e);
            }
        }

        tracing::info!("Loaded {} command(s)", registry.len());
        registry
    }

    /// Register a command
    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<(), PluginError> {
        let name = command.name().to_string();

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(PluginError::Load(format!("invalid command name '{}'", name)));
        }

        if self.commands.contains_key(&name) {
            return Err(PluginError::Duplicate(name));
        }

        tracing::debug!("Registered command: {}", name);
        self.commands.insert(name, command);
        Ok(())
    }

    /// Get a command by its exact name
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// All commands sorted by name
    pub fn all(&self) -> Vec<Arc<dyn Command>> {
        let mut commands: Vec<_> = self.commands.values().cloned().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Load the startup scripts in catalog order
pub fn load_scripts(units: &[PluginUnit<dyn Script>], disabled: &[String]) -> Vec<Arc<dyn Script>> {
    instantiate("script", units, disabled)
}
