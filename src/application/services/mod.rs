//! Application services - Business logic orchestration

pub mod bootstrap;
pub mod config_store;
pub mod guild_config;

pub use bootstrap::BootstrapSequencer;
pub use config_store::ConfigStore;
pub use guild_config::GuildConfigResolver;
