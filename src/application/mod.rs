//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Context: the dependency bundle shared by every component
//! - Services: Config store, guild config resolution, startup sequencing
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing and dispatching

pub mod context;
pub mod errors;
pub mod messaging;
pub mod services;
