//! Configuration management

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::domain::entities::{GuildConfig, FALLBACK_PREFIX};

/// HTTP listener port when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub plugins: PluginConfig,

    /// Transport credential, only ever taken from the environment or CLI
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Prefix of the `/default` template unless `default-guild` names one
    pub default_prefix: String,
    /// Remove the triggering message after a command ran
    pub delete_trigger: bool,
    pub delete_delay_ms: u64,
    /// Extra template settings written to `/default` when the store lacks one
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub default_guild: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingConfig {
    pub error: bool,
    pub warn: bool,
    pub info: bool,
    pub debug: bool,
    pub color: bool,
    pub clear_console_on_start: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluginConfig {
    /// Names of commands, scripts or event plugins to skip at load time
    pub disabled: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "guildkeeper".to_string(),
            default_prefix: FALLBACK_PREFIX.to_string(),
            delete_trigger: true,
            delete_delay_ms: 500,
            default_guild: Map::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            error: true,
            warn: true,
            info: true,
            debug: false,
            color: true,
            clear_console_on_start: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/db.json"),
            pretty: true,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config {}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Load from the process environment on top of the current values
    pub fn load_env(mut self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    /// Apply `TOKEN` and `PORT` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TOKEN").filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }

        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a port number, got '{}'", port)))?;
        }

        Ok(())
    }

    /// The transport credential, required to connect
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("TOKEN".to_string()))
    }

    /// Fallback guild configuration when the store offers no template
    pub fn fallback_guild(&self) -> GuildConfig {
        let prefix = match self.bot.default_prefix.as_str() {
            "" => FALLBACK_PREFIX,
            prefix => prefix,
        };

        let mut cfg = GuildConfig::new(prefix);
        for (key, value) in &self.bot.default_guild {
            match (key.as_str(), value.as_str()) {
                ("prefix", Some(prefix)) if !prefix.is_empty() => cfg.prefix = prefix.to_string(),
                ("prefix", _) => {}
                _ => cfg = cfg.with_setting(key.clone(), value.clone()),
            }
        }
        cfg
    }
}
