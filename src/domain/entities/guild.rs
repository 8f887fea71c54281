use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Reserved top-level key holding the seed template for new guilds
pub const DEFAULT_TEMPLATE_KEY: &str = "default";

/// Prefix used when neither the store nor the settings provide one
pub const FALLBACK_PREFIX: &str = "!";

/// Guild identity, the unit of configuration scoping
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuildId(String);

impl GuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store path of this guild's configuration entry
    pub fn config_path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl From<&str> for GuildId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GuildId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-guild configuration entry.
///
/// `prefix` is the only field the dispatcher reads; every other key a command
/// stores lives in `settings` and round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildConfig {
    #[serde(default = "fallback_prefix")]
    pub prefix: String,

    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

fn fallback_prefix() -> String {
    FALLBACK_PREFIX.to_string()
}

impl GuildConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            settings: Map::new(),
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Value {
        // A struct of a String and a string-keyed map always serializes
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self::new(FALLBACK_PREFIX)
    }
}
