//! Lookup command - Items with an exact name

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{load_config, load_engine, print_info, snapshot_path, working_dir, OutputFormat};
use crate::GlobalOptions;

/// Arguments for the lookup command
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Exact item name (case-sensitive)
    name: String,

    /// Version whose snapshot to read (default: sources.default_version)
    #[arg(long)]
    version: Option<String>,

    /// Read this snapshot file instead of a configured version
    #[arg(long, short = 'a', value_name = "PATH", conflicts_with = "version")]
    artifact: Option<PathBuf>,

    /// Output format: text (default), json, html
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Execute the lookup command
pub async fn execute(args: LookupArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let root = working_dir()?;
    let snapshot = snapshot_path(
        &config,
        &root,
        args.version.as_deref(),
        args.artifact.as_deref(),
    );
    let engine = load_engine(&config, &snapshot)?;

    let items = engine.lookup(&args.name);
    if items.is_empty() {
        print_info(&format!("No item named: {}", args.name), global.quiet);
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&items).context("Failed to serialize items")?;
            println!("{}", json);
        }
        OutputFormat::Html => println!("{}", engine.render_lookup(&args.name)),
        OutputFormat::Text => {
            for item in items {
                println!("{} ({})", item.name, item.item_type.as_str());
                if let Some(ref base) = item.base_type {
                    println!("  Base type: {}", base);
                }
                if let Some(ref type_name) = item.type_name {
                    println!("  Type: {}", type_name);
                }
                for property in item.properties.iter().flatten() {
                    let marker = if property.is_navigation() { " (navigation)" } else { "" };
                    println!("  {}: {}{}", property.name, property.type_name, marker);
                }
                for member in item.members.iter().flatten() {
                    println!("  - {}", member);
                }
            }
        }
    }

    Ok(())
}
