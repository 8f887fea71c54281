use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use guildkeeper::application::errors::BotError;
use guildkeeper::application::services::{BootstrapSequencer, ConfigStore, GuildConfigResolver};
use guildkeeper::infrastructure::adapters::{ConsoleTransport, DiscordTransport};
use guildkeeper::infrastructure::config::Config;
use guildkeeper::infrastructure::logging;
use guildkeeper::infrastructure::storage::JsonStore;
use guildkeeper::plugins::builtin;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "guildkeeper")]
#[command(about = "A plugin-driven guild bot with per-guild configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path [default: config.yaml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bot token (overrides TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve the uptime endpoint
    Run,
    /// Talk to the bot from the terminal (dev mode)
    Console,
    /// Show version
    Version,
    /// Write default settings and an initial store
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        eprintln!("guildkeeper: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), BotError> {
    match cli.command {
        Commands::Version => {
            println!("guildkeeper v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(cli.config.as_deref()),
        Commands::Run => {
            let config = load_config(cli.config.as_deref(), cli.token)?;
            logging::init(&config.logging);

            let token = config.require_token()?.to_string();
            tracing::info!("Starting {}", config.bot.name);

            block_on(BootstrapSequencer::new(config, builtin::catalog()).start(Box::new(DiscordTransport::new(token))))
        }
        Commands::Console => {
            let config = load_config(cli.config.as_deref(), cli.token)?;
            logging::init(&config.logging);

            tracing::info!("Starting {} in console mode", config.bot.name);
            let transport = ConsoleTransport::new(config.bot.name.clone());

            block_on(BootstrapSequencer::new(config, builtin::catalog()).start(Box::new(transport)))
        }
    }
}

fn block_on<F>(future: F) -> Result<(), BotError>
where
    F: std::future::Future<Output = Result<(), BotError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(future)
}

/// An explicitly given file must load; the default one is optional
fn load_config(path: Option<&Path>, token_override: Option<String>) -> Result<Config, BotError> {
    // Local .env files are a convenience only
    let _ = dotenvy::dotenv();

    let config = match path {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)?,
        None => Config::default(),
    };

    let mut config = config.load_env()?;
    if let Some(token) = token_override {
        config.token = Some(token);
    }
    Ok(config)
}

fn init_config(path: Option<&Path>) -> Result<(), BotError> {
    let path = path.unwrap_or(Path::new(DEFAULT_CONFIG));
    let config = Config::default();

    if path.exists() {
        println!("{} already exists, leaving it untouched", path.display());
    } else {
        std::fs::write(path, config.to_yaml()?)
            .map_err(|e| BotError::Internal(format!("Failed to write {}: {}", path.display(), e)))?;
        println!("Wrote {}", path.display());
    }

    block_on(async {
        let store = JsonStore::open(&config.storage.path, config.storage.pretty).await?;
        let resolver = GuildConfigResolver::new(ConfigStore::new(Arc::new(store)), config.fallback_guild());
        resolver.seed_template().await?;
        println!("Initialized store at {}", config.storage.path.display());
        Ok::<(), BotError>(())
    })
}
