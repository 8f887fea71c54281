//! guildkeeper - a plugin-driven guild bot with per-guild configuration

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;

#[cfg(test)]
mod testing;
