//! Browse command - Open a snapshot at a URL fragment
//!
//! Runs the same fragment-driven session a browser page would, then prints
//! the resulting page. `--input` replays search box edits after startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use metaexplorer_backend::Refresher;
use metaexplorer_search::{render_page, ExplorerSession, PageContext, PageState};
use tracing::debug;

use super::{load_config, load_engine, snapshot_path, working_dir};
use crate::GlobalOptions;

/// Arguments for the browse command
#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Fragment to open, e.g. '#type:user' or '#search:message'
    #[arg(default_value = "")]
    fragment: String,

    /// Version whose page to open (default: sources.default_version)
    #[arg(long)]
    version: Option<String>,

    /// Read this snapshot file instead of the version's
    #[arg(long, short = 'a', value_name = "PATH")]
    artifact: Option<PathBuf>,

    /// Search box value typed after startup (repeatable, applied in order)
    #[arg(long = "input", value_name = "TEXT")]
    inputs: Vec<String>,

    /// Print only the results container instead of the whole page
    #[arg(long)]
    results_only: bool,
}

/// Execute the browse command
pub async fn execute(args: BrowseArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let root = working_dir()?;
    let version = args
        .version
        .clone()
        .unwrap_or_else(|| config.sources.default_version.clone());
    let snapshot = snapshot_path(&config, &root, Some(&version), args.artifact.as_deref());
    let engine = load_engine(&config, &snapshot)?;

    let page = PageState::with_versions(config.version_names());
    let mut session = ExplorerSession::bootstrap(engine, page, &args.fragment);
    for input in &args.inputs {
        let changed = session.on_input(input);
        debug!(input = %input, changed, "Replayed input");
    }
    debug!(fragment = %session.fragment(), state = %session.state(), "Session settled");

    let page = session.into_sink();
    if args.results_only {
        println!("{}", page.results);
        return Ok(());
    }

    // An explicit artifact has no refresh record
    let last_updated = match args.artifact {
        Some(_) => None,
        None => Refresher::from_config(&config, &root)
            .context("Failed to set up the refresher")?
            .last_refresh(&version)
            .await
            .context("Failed to read the refresh record")?
            .map(|summary| summary.refreshed_at),
    };

    let source = config.version(&version).ok().map(|v| v.location.as_str());
    let context = PageContext {
        title: &config.pages.title,
        version: &version,
        last_updated,
        source,
    };
    println!("{}", render_page(&context, &page));

    Ok(())
}
