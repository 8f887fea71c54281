//! Logging setup
//!
//! Each level is switched on or off by the `logging` section of the settings,
//! `RUST_LOG` can narrow things further.

use tracing::{Level, Metadata};
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::prelude::*;

use crate::infrastructure::config::LoggingConfig;

/// Directives used when `RUST_LOG` is unset; the level gate does the rest
const DEFAULT_DIRECTIVES: &str =
    "debug,serenity=warn,tracing=warn,h2=warn,hyper=warn,rustls=warn,tungstenite=warn,reqwest=warn";

/// Per-level on/off switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGate {
    pub error: bool,
    pub warn: bool,
    pub info: bool,
    pub debug: bool,
}

impl LevelGate {
    pub fn allows(&self, level: &Level) -> bool {
        if *level == Level::ERROR {
            self.error
        } else if *level == Level::WARN {
            self.warn
        } else if *level == Level::INFO {
            self.info
        } else {
            self.debug
        }
    }

    fn enabled(&self, meta: &Metadata<'_>) -> bool {
        self.allows(meta.level())
    }
}

impl From<&LoggingConfig> for LevelGate {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            error: config.error,
            warn: config.warn,
            info: config.info,
            debug: config.debug,
        }
    }
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) {
    if config.clear_console_on_start {
        print!("\x1B[2J\x1B[1;1H");
    }

    let gate = LevelGate::from(config);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(config.color)
        .with_filter(filter_fn(move |meta| gate.enabled(meta)));

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }
}
