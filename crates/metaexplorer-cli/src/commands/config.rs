//! Config command - View and manage configuration
//!
//! - List the effective configuration with the source of each value
//! - Show configuration file paths
//! - Create a default configuration file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use metaexplorer_config::{ConfigLoader, ExplorerConfig};
use serde::Serialize;

use super::working_dir;
use crate::GlobalOptions;

/// Config management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// List all configuration values with their sources
    List(ListArgs),

    /// Show configuration file paths
    Path(PathArgs),

    /// Create a configuration file with default values
    Init(InitArgs),
}

/// Arguments for the list command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Show only effective values as TOML (hide sources)
    #[arg(long)]
    effective: bool,
}

/// Arguments for the path command
#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the init command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Create ~/.metaexplorer/config.toml instead of the local file
    #[arg(long)]
    global: bool,
}

/// Configuration value with source information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigValue {
    /// Configuration key
    pub key: String,
    /// Current value
    pub value: serde_json::Value,
    /// Source of this value (default, global, local)
    pub source: String,
}

/// Configuration paths
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPaths {
    /// Global config file path
    pub global: Option<PathBuf>,
    /// Local config file path
    pub local: PathBuf,
    /// Whether global config exists
    pub global_exists: bool,
    /// Whether local config exists
    pub local_exists: bool,
}

/// Execute the config command
pub async fn execute(cmd: ConfigCommand, global: GlobalOptions) -> Result<()> {
    match cmd {
        ConfigCommand::List(args) => execute_list(args, global).await,
        ConfigCommand::Path(args) => execute_path(args).await,
        ConfigCommand::Init(args) => execute_init(args).await,
    }
}

async fn execute_list(args: ListArgs, global: GlobalOptions) -> Result<()> {
    if args.effective {
        let effective = super::load_config(&global)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&effective)?);
        } else {
            print!("{}", toml::to_string_pretty(&effective)?);
        }
        return Ok(());
    }

    let root = working_dir()?;
    let mut loader = ConfigLoader::new();

    let default_config = ExplorerConfig::default();
    let global_config = loader.load_global()?.unwrap_or_default();
    let local_config = loader.load_local(&root)?.unwrap_or_default();
    let values = collect_config_values(&default_config, &global_config, &local_config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        print_config_list(&values, &loader, &root);
    }

    Ok(())
}

async fn execute_path(args: PathArgs) -> Result<()> {
    let root = working_dir()?;
    let loader = ConfigLoader::new();

    let global_path = loader.global_config_path();
    let local_path = loader.local_config_path(&root);

    let paths = ConfigPaths {
        global: global_path.clone(),
        local: local_path.clone(),
        global_exists: global_path.as_ref().map(|p| p.exists()).unwrap_or(false),
        local_exists: local_path.exists(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        println!("Configuration Paths");
        println!("===================\n");

        if let Some(ref gp) = paths.global {
            println!("Global: {} ({})", gp.display(), existence(paths.global_exists));
        } else {
            println!("Global: not available (no home directory)");
        }
        println!(
            "Local:  {} ({})",
            paths.local.display(),
            existence(paths.local_exists)
        );
    }

    Ok(())
}

async fn execute_init(args: InitArgs) -> Result<()> {
    let loader = ConfigLoader::new();

    let path = if args.global {
        loader.init_global()
    } else {
        loader.init_local(&working_dir()?)
    }
    .context("Failed to create configuration file")?;

    println!("Configuration file: {}", path.display());
    Ok(())
}

fn existence(exists: bool) -> &'static str {
    if exists {
        "exists"
    } else {
        "not found"
    }
}

/// Collect configuration values with source information
fn collect_config_values(
    default: &ExplorerConfig,
    global: &ExplorerConfig,
    local: &ExplorerConfig,
) -> Result<Vec<ConfigValue>> {
    let mut values = Vec::new();

    let default_json = serde_json::to_value(default)?;
    let global_json = serde_json::to_value(global)?;
    let local_json = serde_json::to_value(local)?;

    flatten_config("", &local_json, &global_json, &default_json, &mut values);

    Ok(values)
}

/// Recursively flatten config into key-value pairs with sources
///
/// Arrays (such as the version list) are reported as a single value.
fn flatten_config(
    prefix: &str,
    local: &serde_json::Value,
    global: &serde_json::Value,
    default: &serde_json::Value,
    values: &mut Vec<ConfigValue>,
) {
    match local {
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };

                let global_val = global.get(key).unwrap_or(&serde_json::Value::Null);
                let default_val = default.get(key).unwrap_or(&serde_json::Value::Null);

                flatten_config(&new_prefix, value, global_val, default_val, values);
            }
        }
        _ => {
            let (value, source) = if local != default {
                (local, "local")
            } else if global != default {
                (global, "global")
            } else {
                (default, "default")
            };

            values.push(ConfigValue {
                key: prefix.to_string(),
                value: value.clone(),
                source: source.to_string(),
            });
        }
    }
}

/// Print configuration in a human-readable format
fn print_config_list(values: &[ConfigValue], loader: &ConfigLoader, root: &Path) {
    println!("MetaExplorer Configuration");
    println!("==========================\n");

    if let Some(gp) = loader.global_config_path() {
        let status = if gp.exists() { "" } else { " (not found)" };
        println!("Global config: {}{}", gp.display(), status);
    }
    let lp = loader.local_config_path(root);
    let status = if lp.exists() { "" } else { " (not found)" };
    println!("Local config:  {}{}\n", lp.display(), status);

    let mut section = "";
    for value in values {
        let (head, key) = value.key.split_once('.').unwrap_or(("", value.key.as_str()));
        if head != section {
            if !section.is_empty() {
                println!();
            }
            println!("[{}]", head);
            section = head;
        }

        let rendered = match &value.value {
            serde_json::Value::Array(items) => format!("[{} entries]", items.len()),
            other => other.to_string(),
        };
        if value.source == "default" {
            println!("  {} = {}", key, rendered);
        } else {
            println!("  {} = {}  ({})", key, rendered, value.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(values: &'a [ConfigValue], key: &str) -> &'a ConfigValue {
        values.iter().find(|v| v.key == key).unwrap()
    }

    #[test]
    fn test_collect_config_values_sources() {
        let default = ExplorerConfig::default();

        let mut global = ExplorerConfig::default();
        global.logging.level = "debug".to_string();
        global.search.threshold = 0.2;

        let mut local = ExplorerConfig::default();
        local.search.threshold = 0.1;

        let values = collect_config_values(&default, &global, &local).unwrap();

        let threshold = find(&values, "search.threshold");
        assert_eq!(threshold.source, "local");
        assert_eq!(threshold.value, serde_json::json!(0.1));

        let level = find(&values, "logging.level");
        assert_eq!(level.source, "global");
        assert_eq!(level.value, serde_json::json!("debug"));

        let prefix = find(&values, "naming.namespace_prefix");
        assert_eq!(prefix.source, "default");
        assert_eq!(prefix.value, serde_json::json!("microsoft.graph."));
    }

    #[test]
    fn test_versions_listed_as_one_value() {
        let config = ExplorerConfig::default();
        let values = collect_config_values(&config, &config, &config).unwrap();

        let versions = find(&values, "sources.versions");
        assert_eq!(versions.value.as_array().map(Vec::len), Some(6));
        assert!(values.iter().all(|v| !v.key.starts_with("sources.versions.")));
    }
}
