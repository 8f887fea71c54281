//! Message handling - Prefix parsing and command dispatch

pub mod context;
pub mod dispatcher;
pub mod parser;

pub use context::DispatchContext;
pub use dispatcher::{CommandDispatcher, DispatchOutcome, IgnoreReason};
pub use parser::{MessageParser, ParsedCommand};
