//! Refresh command - Fetch schema documents and write snapshots
//!
//! One-shot by default. With `--watch` the refresh repeats on a fixed
//! interval until interrupted; a failed round is logged and the next round
//! runs as scheduled.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use metaexplorer_backend::{RefreshOutcome, Refresher};
use metaexplorer_config::VersionSource;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::{load_config_with, print_info, select_versions, working_dir};
use crate::progress::{finish_spinner, finish_spinner_warn, spinner};
use crate::GlobalOptions;

/// Arguments for the refresh command
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Version to refresh (repeatable; default: all configured versions)
    #[arg(long = "version", value_name = "VERSION")]
    versions: Vec<String>,

    /// Keep refreshing on a timer
    #[arg(long, short = 'w')]
    watch: bool,

    /// Seconds between refreshes in watch mode (default: refresh.interval_secs)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Seconds to wait for one schema document (default: refresh.timeout_secs)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Also write the landing pages after each refresh
    #[arg(long)]
    pages: bool,
}

/// Execute the refresh command
pub async fn execute(args: RefreshArgs, global: GlobalOptions) -> Result<()> {
    let mut overrides = global.to_config_overrides();
    overrides.interval_secs = args.interval;
    overrides.timeout_secs = args.timeout;
    let config = load_config_with(&global, &overrides)?;
    let root = working_dir()?;
    let versions = select_versions(&config, &args.versions)?;

    let refresher =
        Refresher::from_config(&config, &root).context("Failed to set up the refresher")?;

    if !args.watch {
        let outcomes = run_round(&refresher, &versions, global.quiet).await;
        if args.pages {
            refresher
                .publish_pages(&config.pages.title, &config.sources.versions)
                .await
                .context("Failed to publish pages")?;
        }

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if failed > 0 {
            anyhow::bail!("{} of {} versions failed to refresh", failed, outcomes.len());
        }
        return Ok(());
    }

    let interval_secs = config.refresh.interval_secs;
    print_info(
        &format!(
            "Refreshing {} versions every {}s (Ctrl-C to stop)",
            versions.len(),
            interval_secs
        ),
        global.quiet,
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_round(&refresher, &versions, global.quiet).await;
                if args.pages {
                    if let Err(e) = refresher
                        .publish_pages(&config.pages.title, &config.sources.versions)
                        .await
                    {
                        warn!("Failed to publish pages: {}", e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping refresh loop");
                break;
            }
        }
    }

    Ok(())
}

/// Refresh the given versions once and report each outcome.
async fn run_round(
    refresher: &Refresher,
    versions: &[VersionSource],
    quiet: bool,
) -> Vec<RefreshOutcome> {
    let pb = spinner(&format!("Refreshing {} versions...", versions.len()), quiet);
    let outcomes = refresher.refresh_all(versions).await;

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed == 0 {
        finish_spinner(pb, &format!("Refreshed {} versions", outcomes.len()));
    } else {
        finish_spinner_warn(
            pb,
            &format!("Refreshed {} of {} versions", outcomes.len() - failed, outcomes.len()),
        );
    }

    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => print_info(
                &format!(
                    "  {:<12} {} items, {} bytes -> {}",
                    summary.version, summary.items, summary.bytes, summary.artifact
                ),
                quiet,
            ),
            Err(e) => eprintln!("  {:<12} failed: {}", outcome.version, e),
        }
    }

    outcomes
}
