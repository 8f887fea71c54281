//! Domain entities - Core business objects with no external dependencies

pub mod guild;
pub mod message;
pub mod user;

pub use guild::{GuildConfig, GuildId, DEFAULT_TEMPLATE_KEY, FALLBACK_PREFIX};
pub use message::{GuildRef, InboundMessage};
pub use user::User;
