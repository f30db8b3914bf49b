//! Biofacts CLI - Turn a biography into a fact table and fine-tuning data.

use biofacts_cli::commands;
use biofacts_cli::{load_config, Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> biofacts_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Categories => {
            commands::execute_categories(&formatter);
        }
        Command::Extract(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::execute_extract(args, config, &formatter).await?;
        }
        Command::Report(args) => {
            let config = load_config(cli.config.as_deref())?;
            commands::execute_report(args, &config, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
