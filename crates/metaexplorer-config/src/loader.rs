//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `~/.metaexplorer/config.toml`
//! 2. Local config: `.metaexplorer/config.toml` (in the working directory)
//! 3. CLI overrides
//!
//! Later sources override earlier ones.

use crate::error::ConfigError;
use crate::{
    ConfigOverrides, ExplorerConfig, LoggingConfig, NamingConfig, PagesConfig, ProjectionConfig,
    RefreshConfig, SearchConfig, SearchWeights, SourcesConfig, StorageConfig,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration directory name.
const GLOBAL_CONFIG_DIR: &str = ".metaexplorer";

/// Local configuration directory name.
const LOCAL_CONFIG_DIR: &str = ".metaexplorer";

/// Configuration loader with caching and inheritance support.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.metaexplorer`)
    global_config_dir: Option<PathBuf>,

    /// Cached global config
    global_config: Option<ExplorerConfig>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.metaexplorer`).
    pub fn new() -> Self {
        let global_config_dir = dirs::home_dir().map(|h| h.join(GLOBAL_CONFIG_DIR));

        Self {
            global_config_dir,
            global_config: None,
        }
    }

    /// Create a loader with a custom global config directory.
    ///
    /// Useful for testing.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
            global_config: None,
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a working directory.
    pub fn local_config_path(&self, root: &Path) -> PathBuf {
        root.join(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration for a working directory with optional CLI overrides.
    ///
    /// Merges config in order: global → local → overrides, then validates
    /// the result.
    pub fn load(
        &mut self,
        root: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<ExplorerConfig, ConfigError> {
        let mut config = ExplorerConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        if let Some(local_config) = self.load_local(root)? {
            config = merge_configs(config, local_config);
        }

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a single explicit config file over the defaults.
    ///
    /// Used for `--config`; global and local files are not consulted.
    pub fn load_file(
        path: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<ExplorerConfig, ConfigError> {
        debug!("Loading config from {:?}", path);
        let mut config = merge_configs(ExplorerConfig::default(), load_config_file(path)?);
        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&mut self) -> Result<Option<ExplorerConfig>, ConfigError> {
        if let Some(ref config) = self.global_config {
            return Ok(Some(config.clone()));
        }

        let Some(global_path) = self.global_config_path() else {
            debug!("No home directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("Global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("Loading global config from {:?}", global_path);
        let config = load_config_file(&global_path)?;

        self.global_config = Some(config.clone());

        Ok(Some(config))
    }

    /// Load only the local configuration for a working directory.
    pub fn load_local(&self, root: &Path) -> Result<Option<ExplorerConfig>, ConfigError> {
        let local_path = self.local_config_path(root);

        if !local_path.exists() {
            trace!("Local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("Loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }

    /// Save configuration to the global config file.
    pub fn save_global(&self, config: &ExplorerConfig) -> Result<(), ConfigError> {
        let Some(ref global_dir) = self.global_config_dir else {
            return Err(ConfigError::NoHomeDir);
        };

        let global_path = global_dir.join(CONFIG_FILE_NAME);
        save_config_file(&global_path, config)
    }

    /// Save configuration to the local config file for a working directory.
    pub fn save_local(&self, root: &Path, config: &ExplorerConfig) -> Result<(), ConfigError> {
        let local_path = self.local_config_path(root);
        save_config_file(&local_path, config)
    }

    /// Initialize global configuration directory.
    ///
    /// Creates `~/.metaexplorer/config.toml` with default configuration.
    pub fn init_global(&self) -> Result<PathBuf, ConfigError> {
        let Some(ref global_dir) = self.global_config_dir else {
            return Err(ConfigError::NoHomeDir);
        };
        init_dir(global_dir)
    }

    /// Initialize local configuration for a working directory.
    ///
    /// Creates `.metaexplorer/config.toml` with default configuration.
    pub fn init_local(&self, root: &Path) -> Result<PathBuf, ConfigError> {
        init_dir(&root.join(LOCAL_CONFIG_DIR))
    }

    /// Clear cached global configuration.
    ///
    /// Forces reload on next `load_global()` call.
    pub fn clear_cache(&mut self) {
        self.global_config = None;
    }
}

/// Write a default config into `dir` unless one already exists.
fn init_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        save_config_file(&config_path, &ExplorerConfig::default())?;
    }

    Ok(config_path)
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<ExplorerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Save a configuration file to disk.
fn save_config_file(path: &Path, config: &ExplorerConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// This performs a field-by-field merge, allowing partial configs.
fn merge_configs(base: ExplorerConfig, overlay: ExplorerConfig) -> ExplorerConfig {
    ExplorerConfig {
        sources: merge_sources(base.sources, overlay.sources),
        naming: merge_naming(base.naming, overlay.naming),
        projection: merge_projection(base.projection, overlay.projection),
        search: merge_search(base.search, overlay.search),
        storage: merge_storage(base.storage, overlay.storage),
        pages: merge_pages(base.pages, overlay.pages),
        refresh: merge_refresh(base.refresh, overlay.refresh),
        logging: merge_logging(base.logging, overlay.logging),
    }
}

/// Merge sources: overlay versions replace same-named base versions in place
/// and new ones are appended.
fn merge_sources(base: SourcesConfig, overlay: SourcesConfig) -> SourcesConfig {
    let defaults = SourcesConfig::default();

    let versions = if overlay.versions == defaults.versions {
        base.versions
    } else {
        let mut versions = base.versions;
        for version in overlay.versions {
            match versions.iter_mut().find(|v| v.name == version.name) {
                Some(existing) => *existing = version,
                None => versions.push(version),
            }
        }
        versions
    };

    SourcesConfig {
        default_version: if overlay.default_version != defaults.default_version {
            overlay.default_version
        } else {
            base.default_version
        },
        versions,
    }
}

/// Merge naming config.
fn merge_naming(base: NamingConfig, overlay: NamingConfig) -> NamingConfig {
    let defaults = NamingConfig::default();
    NamingConfig {
        namespace_prefix: if overlay.namespace_prefix != defaults.namespace_prefix {
            overlay.namespace_prefix
        } else {
            base.namespace_prefix
        },
        primitive_prefix: if overlay.primitive_prefix != defaults.primitive_prefix {
            overlay.primitive_prefix
        } else {
            base.primitive_prefix
        },
    }
}

/// Merge projection config.
fn merge_projection(_base: ProjectionConfig, overlay: ProjectionConfig) -> ProjectionConfig {
    ProjectionConfig {
        include_inherited: overlay.include_inherited, // Always use overlay
    }
}

/// Merge search config.
fn merge_search(base: SearchConfig, overlay: SearchConfig) -> SearchConfig {
    let defaults = SearchConfig::default();
    SearchConfig {
        min_match_char_length: if overlay.min_match_char_length != defaults.min_match_char_length
        {
            overlay.min_match_char_length
        } else {
            base.min_match_char_length
        },
        threshold: if overlay.threshold != defaults.threshold {
            overlay.threshold
        } else {
            base.threshold
        },
        limit: overlay.limit.or(base.limit),
        weights: merge_weights(base.weights, overlay.weights),
    }
}

/// Merge search weights key by key.
fn merge_weights(base: SearchWeights, overlay: SearchWeights) -> SearchWeights {
    let defaults = SearchWeights::default();
    let pick = |overlay: f64, default: f64, base: f64| {
        if overlay != default {
            overlay
        } else {
            base
        }
    };
    SearchWeights {
        name: pick(overlay.name, defaults.name, base.name),
        base_type: pick(overlay.base_type, defaults.base_type, base.base_type),
        type_name: pick(overlay.type_name, defaults.type_name, base.type_name),
        property_name: pick(overlay.property_name, defaults.property_name, base.property_name),
        property_type: pick(overlay.property_type, defaults.property_type, base.property_type),
        members: pick(overlay.members, defaults.members, base.members),
    }
}

/// Merge storage config.
fn merge_storage(base: StorageConfig, overlay: StorageConfig) -> StorageConfig {
    StorageConfig {
        output_dir: if overlay.output_dir != StorageConfig::default().output_dir {
            overlay.output_dir
        } else {
            base.output_dir
        },
    }
}

/// Merge pages config.
fn merge_pages(base: PagesConfig, overlay: PagesConfig) -> PagesConfig {
    PagesConfig {
        title: if overlay.title != PagesConfig::default().title {
            overlay.title
        } else {
            base.title
        },
    }
}

/// Merge refresh config.
fn merge_refresh(base: RefreshConfig, overlay: RefreshConfig) -> RefreshConfig {
    let defaults = RefreshConfig::default();
    RefreshConfig {
        interval_secs: if overlay.interval_secs != defaults.interval_secs {
            overlay.interval_secs
        } else {
            base.interval_secs
        },
        timeout_secs: if overlay.timeout_secs != defaults.timeout_secs {
            overlay.timeout_secs
        } else {
            base.timeout_secs
        },
    }
}

/// Merge logging config.
fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: if overlay.level != LoggingConfig::default().level {
            overlay.level
        } else {
            base.level
        },
        format: overlay.format,
    }
}
