//! services/tracker/src/bin/tracker.rs

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_lib::{
    adapters::JsonFileStorage,
    cli::{self, AppState, Cli, Output},
    config::Config,
    error::AppError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Command failed: {:?}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!("Using data directory {}", config.data_dir.display());

    // --- 2. Open Storage & Initialize Stores ---
    let storage = Arc::new(JsonFileStorage::open(&config.data_dir).await?);
    let mut state = AppState::init(Arc::new(config), storage).await?;

    // --- 3. Run the Command ---
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let mut out = Output {
        writer: &mut handle,
        json: cli.json,
    };
    let result = cli::run(cli.command, &mut state, &mut out).await;
    handle.flush()?;

    state.dispose();
    result
}
