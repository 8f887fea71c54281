//! Transport adapters

pub mod console;
pub mod discord;

pub use console::{ConsoleSession, ConsoleTransport};
pub use discord::{DiscordSession, DiscordTransport};
