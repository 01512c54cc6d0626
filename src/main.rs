use anyhow::Result;
use clap::{CommandFactory, Parser};

use disk_reclaim::cli::{Cli, Command};
use disk_reclaim::commands;
use disk_reclaim::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    tracing::debug!(?config, "Loaded configuration");

    // Dispatch to subcommand
    match cli.command {
        Command::Scan(args) => {
            tracing::info!(?args, "Starting scan");
            commands::scan::run(args, &config, cli.quiet)?;
        }
        Command::Packages(args) => {
            tracing::info!(?args, "Listing packages");
            commands::packages::run(args, &config)?;
        }
        Command::Remove(args) => {
            tracing::info!(?args, "Removing paths");
            commands::remove::run(args)?;
        }
        Command::Uninstall(args) => {
            tracing::info!(?args, "Uninstalling package");
            commands::packages::run_uninstall(args, &config)?;
        }
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "disk-reclaim",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("disk_reclaim={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
