//! Sales dashboard main entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use salesdash_api::{start_server, AppState};
use salesdash_config::{Config, ConfigError};
use salesdash_core::{SqliteTransactionStore, StoreRef};

#[derive(Parser, Debug)]
#[command(name = "salesdash")]
#[command(version = "0.1.0")]
#[command(about = "Sales-transaction dashboard backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Seed the store from the feed before serving
    #[arg(long)]
    seed: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (mut config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("invalid config {}", args.config.display()));
        }
    };

    let level = config.log_filter().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if missing {
        warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        info!("Config loaded from {}", args.config.display());
    }
    if args.seed {
        config.seed.on_startup = true;
    }
    info!("Combined view chart scope: {}", config.combined.chart_scope);

    let store: StoreRef = Arc::new(
        SqliteTransactionStore::connect(&config.store)
            .await
            .context("failed to open transaction store")?,
    );
    let state = AppState::from_config(config.clone(), store).context("failed to build feed client")?;

    if config.seed.on_startup {
        match state.seeder.initialize().await {
            Ok(report) => info!("Startup seed done: {} transactions", report.inserted),
            Err(e) => error!("Startup seed failed: {}", e),
        }
    }

    start_server(state).await.context("server error")?;
    Ok(())
}
