//! Domain traits - Abstractions for infrastructure implementations

pub mod session;
pub mod store;

pub use session::{BotInfo, Session};
pub use store::DocumentStore;
