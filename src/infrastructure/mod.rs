//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Settings file and environment loading
//! - Logging: Subscriber setup
//! - Storage: JSON document persistence
//! - Http: Liveness endpoint and static files
//! - Adapters: Platform integrations (Discord, console)

pub mod adapters;
pub mod config;
pub mod http;
pub mod logging;
pub mod storage;
