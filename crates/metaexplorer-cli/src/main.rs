//! MetaExplorer CLI - Schema snapshots and fuzzy exploration
//!
//! A command-line interface for turning OData schema documents into
//! searchable snapshots and exploring them.
//!
//! # Usage
//!
//! ```bash
//! # Fetch every configured version and write its snapshot
//! metaexplorer refresh
//!
//! # Keep refreshing on a timer
//! metaexplorer refresh --watch --interval 300
//!
//! # Search a snapshot
//! metaexplorer search message --version beta
//!
//! # Show the page a fragment leads to
//! metaexplorer browse '#type:user'
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use metaexplorer_config::{ConfigOverrides, LogFormat};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod progress;

/// MetaExplorer - Browse OData schema metadata
#[derive(Parser, Debug)]
#[command(name = "metaexplorer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Path to configuration file
    #[arg(long, short = 'c', global = true, env = "METAEXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory generated artifacts are written to and read from
    #[arg(long, short = 'o', global = true, env = "METAEXPLORER_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "METAEXPLORER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_dir: self.output_dir.clone(),
            log_level: self.log_level.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch schema documents and write one snapshot per version
    Refresh(commands::refresh::RefreshArgs),

    /// Write the landing page of every version and the stylesheet
    Pages(commands::pages::PagesArgs),

    /// Fuzzy search a snapshot
    Search(commands::search::SearchArgs),

    /// Show the items with an exact name
    Lookup(commands::lookup::LookupArgs),

    /// Open a snapshot at a URL fragment and print the page
    Browse(commands::browse::BrowseArgs),

    /// View and manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

/// Level from the flags, falling back to the configured one.
fn log_level(global: &GlobalOptions, configured: &str) -> Level {
    if global.quiet {
        Level::ERROR
    } else if global.verbose {
        Level::DEBUG
    } else {
        configured.parse().unwrap_or(Level::INFO)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration errors are reported by the command itself
    let logging = commands::load_config(&cli.global)
        .map(|config| config.logging)
        .unwrap_or_default();
    let level = log_level(&cli.global, &logging.level);

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().finish())?;
        }
        LogFormat::Text => {
            tracing::subscriber::set_global_default(builder.with_ansi(true).finish())?;
        }
    }

    // Execute the command
    match cli.command {
        Commands::Refresh(args) => commands::refresh::execute(args, cli.global).await,
        Commands::Pages(args) => commands::pages::execute(args, cli.global).await,
        Commands::Search(args) => commands::search::execute(args, cli.global).await,
        Commands::Lookup(args) => commands::lookup::execute(args, cli.global).await,
        Commands::Browse(args) => commands::browse::execute(args, cli.global).await,
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global).await,
    }
}
