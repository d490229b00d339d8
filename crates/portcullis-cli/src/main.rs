//! Portcullis CLI.
//!
//! Inspects and checks menu-driven permissions against a directory snapshot.
//!
//! # Quick Start
//!
//! ```bash
//! # What may alice do?
//! portcullis abilities alice
//!
//! # May alice delete users?
//! portcullis check alice delete /users
//!
//! # Which resource type does a menu path map to?
//! portcullis resolve /roles/assign
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use portcullis_config::{ConfigLoader, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Portcullis - menu-driven role-based access control.
#[derive(Parser)]
#[command(name = "portcullis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding portcullis.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Directory snapshot to read (overrides `directory.snapshot`).
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// List the abilities of a principal.
    Abilities {
        /// Principal (username) to inspect.
        principal: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check whether a principal may perform an action.
    Check {
        /// Principal (username).
        principal: String,

        /// Action name, e.g. read or delete.
        action: String,

        /// Resource type (user, role, menu, log, auth) or a path such as /users.
        subject: String,
    },

    /// Resolve a structural path to its resource type.
    Resolve {
        /// Path, e.g. /users/42.
        path: String,
    },

    /// Show the effective configuration.
    Config {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Text)]
        format: ConfigFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ConfigFormat {
    Text,
    Json,
    Toml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        style::set_no_color(true);
    }

    if let Commands::Version = cli.command {
        commands::version::run();
        return Ok(());
    }

    let mut config = ConfigLoader::new()
        .with_project_dir(&cli.project)
        .load()
        .with_context(|| format!("Failed to load configuration from {}", cli.project.display()))?;

    if let Some(snapshot) = cli.snapshot {
        config.directory.snapshot = snapshot;
    }

    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Version => Ok(()),
        Commands::Abilities { principal, format } => {
            commands::abilities::run(&config, &principal, format)
        }
        Commands::Check {
            principal,
            action,
            subject,
        } => commands::check::run(&config, &principal, &action, &subject),
        Commands::Resolve { path } => commands::resolve::run(&config, &path),
        Commands::Config { format } => commands::config::show(&config, &cli.project, format),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid logging.level `{}`", logging.level))?,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Json => subscriber.json().init(),
    }

    Ok(())
}
