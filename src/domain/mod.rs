//! Domain layer - Core business objects and the seams to infrastructure
//! 
//! This layer contains:
//! - Entities: Guild configuration, inbound messages, users
//! - Traits: Abstractions for infrastructure (Session, DocumentStore)

pub mod entities;
pub mod traits;
