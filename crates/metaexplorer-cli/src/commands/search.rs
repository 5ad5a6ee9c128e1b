//! Search command - Fuzzy search over a snapshot

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use metaexplorer_core::InterchangeItem;
use metaexplorer_search::SearchHit;

use super::{load_config, load_engine, print_info, snapshot_path, working_dir, OutputFormat};
use crate::GlobalOptions;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    query: String,

    /// Version whose snapshot to search (default: sources.default_version)
    #[arg(long)]
    version: Option<String>,

    /// Search this snapshot file instead of a configured version
    #[arg(long, short = 'a', value_name = "PATH", conflicts_with = "version")]
    artifact: Option<PathBuf>,

    /// Maximum number of results to return (default: search.limit, unlimited)
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Output format: text (default), json, html
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    format: OutputFormat,
}

/// One hit in JSON output.
#[derive(Debug, Serialize)]
struct HitOutput<'a> {
    position: usize,
    score: f64,
    matched: Vec<&'static str>,
    item: &'a InterchangeItem,
}

impl<'a> From<&SearchHit<'a>> for HitOutput<'a> {
    fn from(hit: &SearchHit<'a>) -> Self {
        Self {
            position: hit.position,
            score: hit.score,
            matched: hit.matched_keys.iter().map(|k| k.as_str()).collect(),
            item: hit.item,
        }
    }
}

/// Execute the search command
pub async fn execute(args: SearchArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let root = working_dir()?;
    let snapshot = snapshot_path(
        &config,
        &root,
        args.version.as_deref(),
        args.artifact.as_deref(),
    );
    let engine = load_engine(&config, &snapshot)?;

    let mut hits = engine.search(&args.query);
    if let Some(limit) = args.limit.or(config.search.limit) {
        hits.truncate(limit);
    }

    if hits.is_empty() {
        print_info(&format!("No results found for: {}", args.query), global.quiet);
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let out: Vec<HitOutput<'_>> = hits.iter().map(HitOutput::from).collect();
            let json = serde_json::to_string_pretty(&out).context("Failed to serialize results")?;
            println!("{}", json);
        }
        OutputFormat::Html => {
            println!(
                "{}",
                engine.renderer().render_items(hits.iter().map(|hit| hit.item))
            );
        }
        OutputFormat::Text => {
            if !global.quiet {
                println!("Found {} results for \"{}\":\n", hits.len(), args.query);
            }

            for (i, hit) in hits.iter().enumerate() {
                println!("{}. {} ({})", i + 1, hit.item.name, hit.item.item_type.as_str());
                let matched: Vec<_> = hit.matched_keys.iter().map(|k| k.as_str()).collect();
                println!("   Score: {:.3}  Matched: {}", hit.score, matched.join(", "));
            }
        }
    }

    Ok(())
}
