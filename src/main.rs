//! syncstore - Sync response cache tool
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use syncstore::cli::{commands, Cli, Commands};
use syncstore::config::ConfigManager;
use syncstore::error::SyncStoreResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SyncStoreResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);

    // Config command doesn't need a store
    if let Commands::Config(args) = cli.command {
        return commands::config(args, &config_manager, &config).await;
    }

    let store = commands::open_store(cli.user.as_deref(), &config)?;

    let result = match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Status => commands::status(&store).await,
        Commands::Show(args) => commands::show(args, &store).await,
        Commands::Merge(args) => commands::merge(args, &store).await,
        Commands::Clear(args) => commands::clear(args, &store).await,
        Commands::Event(args) => commands::event(args, &store).await,
        Commands::Summary(args) => commands::summary(args, &store).await,
        Commands::Rooms(args) => commands::rooms(args, &store).await,
    };

    // Queued writes must land before the runtime shuts down
    store.flush().await;
    result
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("syncstore=warn"),
        1 => EnvFilter::new("syncstore=info"),
        _ => EnvFilter::new("syncstore=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
