mod config;
mod logging;
mod shutdown;

use std::path::PathBuf;

use anyhow::{Context, Result};
use arh_transport_grpc::{BoundListener, ListenConfig};
use bastions::BastionsModule;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, CliOverrides};

/// ARH Server - discovers bastion instances for a credential profile
#[derive(Parser)]
#[command(name = "arh-server")]
#[command(about = "ARH Server - discovers bastion instances for a credential profile")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override (`host:port` or `uds:///path`)
    #[arg(short, long)]
    listen: Option<String>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (ARH__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        listen_addr: cli.listen.clone(),
    });

    logging::init_logging(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_pretty_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn listen_config(config: &AppConfig) -> Result<ListenConfig> {
    config
        .server
        .listen_addr
        .parse()
        .context("invalid server.listen_addr")
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    listen_config(config)?;
    println!("Configuration is valid");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ARH Server starting");

    let listen = listen_config(&config)?;
    let module = BastionsModule::new(config.discovery, config.login);
    let listener = BoundListener::bind(&listen).await?;

    let cancel = CancellationToken::new();
    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        match shutdown::shutdown_signal().await {
            Ok(signal) => tracing::info!(signal, "shutdown signal received, stopping gRPC server"),
            Err(e) => {
                // Without handlers the server only stops when the process is killed
                tracing::error!(error = %e, "signal handlers unavailable");
                return;
            }
        }
        cancel_for_signals.cancel();
    });

    listener.serve(module.routes(), cancel).await
}
