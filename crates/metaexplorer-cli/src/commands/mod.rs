//! CLI command implementations
//!
//! This module contains all MetaExplorer CLI command implementations.

pub mod browse;
pub mod config;
pub mod lookup;
pub mod pages;
pub mod refresh;
pub mod search;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use metaexplorer_backend::settings::{renderer, search_options};
use metaexplorer_config::{ConfigLoader, ConfigOverrides, ExplorerConfig, VersionSource};
use metaexplorer_search::{snapshot_name, QueryEngine, SearchIndex};
use tracing::debug;

use crate::GlobalOptions;

/// Output format for commands that print items
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
    /// The HTML cards a page would show
    Html,
}

/// Directory relative paths in the configuration resolve against.
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current directory")
}

/// Load configuration with optional config file override.
///
/// CLI overrides are applied in both cases.
pub fn load_config(global: &GlobalOptions) -> Result<ExplorerConfig> {
    load_config_with(global, &global.to_config_overrides())
}

/// Load configuration, applying the given overrides instead of only the
/// global ones.
pub fn load_config_with(
    global: &GlobalOptions,
    overrides: &ConfigOverrides,
) -> Result<ExplorerConfig> {
    if let Some(ref config_path) = global.config {
        return ConfigLoader::load_file(config_path, Some(overrides))
            .with_context(|| format!("Failed to load config file {}", config_path.display()));
    }

    let root = working_dir()?;
    ConfigLoader::new()
        .load(&root, Some(overrides))
        .context("Failed to load configuration")
}

/// The configured versions named on the command line, or all of them.
pub fn select_versions(config: &ExplorerConfig, names: &[String]) -> Result<Vec<VersionSource>> {
    if names.is_empty() {
        return Ok(config.sources.versions.clone());
    }
    names
        .iter()
        .map(|name| config.version(name).cloned().map_err(anyhow::Error::from))
        .collect()
}

/// Snapshot file for a version, or the explicit artifact if given.
pub fn snapshot_path(
    config: &ExplorerConfig,
    root: &Path,
    version: Option<&str>,
    artifact: Option<&Path>,
) -> PathBuf {
    match artifact {
        Some(path) => path.to_path_buf(),
        None => {
            let version = version.unwrap_or(&config.sources.default_version);
            config.output_dir(root).join(snapshot_name(version))
        }
    }
}

/// Build a query engine over a stored snapshot.
pub fn load_engine(config: &ExplorerConfig, snapshot: &Path) -> Result<QueryEngine> {
    debug!("Loading snapshot from {:?}", snapshot);
    let text = std::fs::read_to_string(snapshot).with_context(|| {
        format!(
            "Failed to read snapshot {} (run `metaexplorer refresh` first)",
            snapshot.display()
        )
    })?;

    let index = SearchIndex::from_snapshot(&text, search_options(config))
        .with_context(|| format!("Failed to index snapshot {}", snapshot.display()))?;
    debug!("Indexed {} items", index.len());

    Ok(QueryEngine::new(index, renderer(config)))
}

/// Print an info message (respects quiet flag).
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message);
    }
}
