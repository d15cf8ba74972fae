//! Photobook CLI binary.
//!
//! Maintenance entry points for the upload store:
//! - Initialize the bucket layout
//! - Run purge passes by hand
//! - Run the scheduled purge server

use clap::Parser;
use photobook::PhotobookConfig;
use tracing_subscriber::EnvFilter;

mod cli;

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, init_storage, list_bucket, run_purge, serve};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let config = PhotobookConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => {
            init_storage(&config)?;
        }
        Commands::Ls { bucket } => {
            list_bucket(&config, bucket).await?;
        }
        Commands::Purge { target } => {
            run_purge(&config, target.tasks()).await?;
        }
        Commands::Serve => {
            serve(&config).await?;
        }
    }

    Ok(())
}
