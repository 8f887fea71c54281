//! Plugin system for guildkeeper
//! 
//! Commands, startup scripts and transport-event handlers are registered in a
//! static catalog and loaded once at startup.

pub mod builtin;
pub mod events;
pub mod registry;
pub mod trait_def;

pub use events::EventRegistry;
pub use registry::{load_scripts, PluginCatalog, PluginRegistry, PluginUnit};
pub use trait_def::{Command, EventKind, EventPlugin, Plugin, Script, TransportEvent};
