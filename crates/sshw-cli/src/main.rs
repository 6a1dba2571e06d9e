//! sshw CLI
//!
//! Without a subcommand sshw opens the interactive host picker. The
//! subcommands inspect and maintain the config file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sshw::commands;
use sshw::output::{print_error, print_info};
use sshw_core::config;
use sshw_core::ConfigError;

#[derive(Parser)]
#[command(name = "sshw")]
#[command(author, version, about = "Interactive SSH host launcher")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file (default ~/.sshw.toml)
    #[arg(short = 'c', long = "cfg", global = true)]
    cfg: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured groups and targets
    #[command(alias = "ls")]
    List {
        /// Also show aliases and credential kinds
        #[arg(short, long)]
        long: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show config file path
    Path,
    /// Show current configuration with secrets redacted
    Show,
    /// Check the configuration for errors
    Validate,
    /// Copy the config file to a timestamped backup
    Backup,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path =
        config::config_path(cli.cfg.as_deref()).context("Failed to resolve config path")?;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let config = match config::load_or_generate(&config_path) {
                Ok(config) => config,
                Err(e @ ConfigError::Generated(_)) => {
                    print_info(&e.to_string());
                    std::process::exit(1);
                }
                Err(e) => {
                    print_error(&format!("Failed to load {:?}: {}", config_path, e));
                    std::process::exit(1);
                }
            };
            return sshw::run_interactive_session(config).await;
        }
    };

    match command {
        Commands::List { long } => {
            commands::list_command(&config_path, long)?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Path => {
                commands::config_path(&config_path)?;
            }
            ConfigAction::Show => {
                commands::config_show(&config_path)?;
            }
            ConfigAction::Validate => {
                commands::config_validate(&config_path)?;
            }
            ConfigAction::Backup => {
                commands::config_backup(&config_path)?;
            }
            ConfigAction::Init { force } => {
                commands::config_init(&config_path, force)?;
            }
        },

        Commands::Version => {
            println!("sshw {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
