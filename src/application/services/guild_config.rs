use serde_json::Value;

use crate::application::errors::StorageError;
use crate::domain::entities::{GuildConfig, GuildId, DEFAULT_TEMPLATE_KEY};
use super::config_store::ConfigStore;

/// Resolves a guild's configuration, seeding it from the `default` template
/// the first time the guild is seen.
///
/// Seeding only ever goes through the store's create-if-absent write, so the
/// message path and the join path can race on a new guild and still end up
/// with one entry that matches the template.
#[derive(Clone)]
pub struct GuildConfigResolver {
    store: ConfigStore,
    fallback: GuildConfig,
}

impl GuildConfigResolver {
    pub fn new(store: ConfigStore, fallback: GuildConfig) -> Self {
        Self { store, fallback }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    fn template_path() -> String {
        format!("/{}", DEFAULT_TEMPLATE_KEY)
    }

    /// Write the fallback template to `/default` unless one is already there
    pub async fn seed_template(&self) -> Result<(), StorageError> {
        self.store
            .merge(&Self::template_path(), self.fallback.to_value())
            .await
    }

    /// The current seed template
    pub async fn template(&self) -> Value {
        match self.store.get(&Self::template_path()).await {
            Some(template) => template,
            None => {
                tracing::warn!("No '{}' template in store, using built-in defaults", DEFAULT_TEMPLATE_KEY);
                self.fallback.to_value()
            }
        }
    }

    /// Configuration for `guild`, seeding it on first sight
    pub async fn resolve(&self, guild: &GuildId) -> GuildConfig {
        let path = guild.config_path();

        if let Some(existing) = self.store.get(&path).await {
            return self.decode(guild, existing);
        }

        let template = self.template().await;
        if let Err(e) = self.store.merge(&path, template.clone()).await {
            tracing::warn!("Failed to seed configuration for guild {}: {}", guild, e);
        }

        // Re-read: a concurrent seeder may have won, both wrote the same template
        match self.store.get(&path).await {
            Some(seeded) => self.decode(guild, seeded),
            None => self.decode(guild, template),
        }
    }

    /// Join-path seeding.
    ///
    /// Always issues the create-if-absent write, which fills in template keys the
    /// entry lacks but never replaces a customized value.
    pub async fn provision(&self, guild: &GuildId) -> GuildConfig {
        let path = guild.config_path();
        let existed = self.store.get(&path).await.is_some();

        let template = self.template().await;
        match self.store.merge(&path, template).await {
            Ok(()) if !existed => tracing::info!("Seeded configuration for guild {}", guild),
            Ok(()) => tracing::debug!("Guild {} already configured", guild),
            Err(e) => tracing::warn!("Failed to seed configuration for guild {}: {}", guild, e),
        }

        self.resolve(guild).await
    }

    fn decode(&self, guild: &GuildId, value: Value) -> GuildConfig {
        GuildConfig::from_value(value).unwrap_or_else(|e| {
            tracing::warn!("Configuration of guild {} is malformed, using defaults: {}", guild, e);
            self.fallback.clone()
        })
    }
}
