//! MetaExplorer Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.metaexplorer/config.toml`
//! - Local config: `.metaexplorer/config.toml` (in the working directory)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Root configuration for MetaExplorer.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Schema versions and where their documents live
    pub sources: SourcesConfig,

    /// Type name shortening
    pub naming: NamingConfig,

    /// Projection of schema graphs
    pub projection: ProjectionConfig,

    /// Fuzzy search tuning
    pub search: SearchConfig,

    /// Output location for artifacts
    pub storage: StorageConfig,

    /// Landing page settings
    pub pages: PagesConfig,

    /// Refresh schedule
    pub refresh: RefreshConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// One schema version and the location of its document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionSource {
    /// Version name, also the artifact base name (`<name>.js`)
    pub name: String,

    /// `http(s)://` URL or file path of the schema document
    pub location: String,
}

impl VersionSource {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Schema sources configuration.
///
/// # Example TOML
///
/// ```toml
/// [sources]
/// default_version = "beta"
///
/// [[sources.versions]]
/// name = "beta"
/// location = "https://graph.microsoft.com/beta/$metadata"
///
/// [[sources.versions]]
/// name = "local"
/// location = "./metadata/local.xml"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Version used when a command does not name one
    pub default_version: String,

    /// Versions in navigation order
    pub versions: Vec<VersionSource>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            default_version: "v1".to_string(),
            versions: default_versions(),
        }
    }
}

/// The Microsoft Graph metadata documents.
pub fn default_versions() -> Vec<VersionSource> {
    vec![
        VersionSource::new("v1", "https://graph.microsoft.com/v1.0/$metadata"),
        VersionSource::new("stagingv1", "https://graph.microsoft.com/stagingv1.0/$metadata"),
        VersionSource::new(
            "cleanv1",
            "https://raw.githubusercontent.com/microsoftgraph/msgraph-metadata/master/clean_v10_metadata/cleanMetadataWithDescriptionsv1.0.xml",
        ),
        VersionSource::new("beta", "https://graph.microsoft.com/beta/$metadata"),
        VersionSource::new("stagingbeta", "https://graph.microsoft.com/stagingbeta/$metadata"),
        VersionSource::new(
            "cleanbeta",
            "https://raw.githubusercontent.com/microsoftgraph/msgraph-metadata/master/clean_beta_metadata/cleanMetadataWithDescriptionsbeta.xml",
        ),
    ]
}

/// Type name shortening configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    /// Namespace prefix removed from every emitted type name
    pub namespace_prefix: String,

    /// Prefix marking built-in primitive types (never linked)
    pub primitive_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: "microsoft.graph.".to_string(),
            primitive_prefix: "Edm.".to_string(),
        }
    }
}

/// Projection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// List properties inherited from base types
    pub include_inherited: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            include_inherited: true,
        }
    }
}

/// Fuzzy search configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this return no results
    pub min_match_char_length: usize,

    /// Tolerated fraction of edit errors (0.0 = exact substring)
    pub threshold: f64,

    /// Maximum number of results rendered (None = all)
    pub limit: Option<usize>,

    /// Key weights
    pub weights: SearchWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_match_char_length: 3,
            threshold: 0.0,
            limit: None,
            weights: SearchWeights::default(),
        }
    }
}

/// Per-key search weights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchWeights {
    pub name: f64,
    pub base_type: f64,
    pub type_name: f64,
    pub property_name: f64,
    pub property_type: f64,
    pub members: f64,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            name: 10.0,
            base_type: 2.0,
            type_name: 2.0,
            property_name: 1.0,
            property_type: 1.0,
            members: 1.0,
        }
    }
}

impl SearchWeights {
    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("name", self.name),
            ("base_type", self.base_type),
            ("type_name", self.type_name),
            ("property_name", self.property_name),
            ("property_type", self.property_type),
            ("members", self.members),
        ]
    }
}

/// Storage configuration for generated artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving snapshots and pages (default: `site`)
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("site"),
        }
    }
}

/// Landing page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Title shown in the page header
    pub title: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            title: "Graph Metadata Explorer".to_string(),
        }
    }
}

/// Refresh schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between refreshes in watch mode
    pub interval_secs: u64,

    /// Timeout for fetching one schema document
    pub timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            timeout_secs: 60,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON structured logging
    Json,
}

/// CLI overrides for configuration values.
///
/// Used to apply command-line arguments over file-based config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override artifact output directory
    pub output_dir: Option<PathBuf>,

    /// Override log level
    pub log_level: Option<String>,

    /// Override refresh interval
    pub interval_secs: Option<u64>,

    /// Override fetch timeout
    pub timeout_secs: Option<u64>,
}

impl ExplorerConfig {
    /// Apply CLI overrides to this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref dir) = overrides.output_dir {
            self.storage.output_dir = dir.clone();
        }

        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }

        if let Some(interval) = overrides.interval_secs {
            self.refresh.interval_secs = interval;
        }

        if let Some(timeout) = overrides.timeout_secs {
            self.refresh.timeout_secs = timeout;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for version in &self.sources.versions {
            if version.name.is_empty() {
                return Err(ConfigError::invalid_value(
                    "sources.versions.name",
                    "version name must not be empty",
                ));
            }
            if version.location.is_empty() {
                return Err(ConfigError::invalid_value(
                    format!("sources.versions.{}.location", version.name),
                    "location must not be empty",
                ));
            }
            if !seen.insert(version.name.as_str()) {
                return Err(ConfigError::invalid_value(
                    "sources.versions",
                    format!("duplicate version '{}'", version.name),
                ));
            }
        }
        if !seen.contains(self.sources.default_version.as_str()) {
            return Err(ConfigError::invalid_value(
                "sources.default_version",
                format!(
                    "'{}' is not a configured version",
                    self.sources.default_version
                ),
            ));
        }

        if self.search.min_match_char_length == 0 {
            return Err(ConfigError::invalid_value(
                "search.min_match_char_length",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(ConfigError::invalid_value(
                "search.threshold",
                "must be between 0.0 and 1.0",
            ));
        }
        for (key, weight) in self.search.weights.entries() {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ConfigError::invalid_value(
                    format!("search.weights.{}", key),
                    "must be a positive number",
                ));
            }
        }

        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "refresh.interval_secs",
                "must be greater than zero",
            ));
        }
        if self.refresh.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "refresh.timeout_secs",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Look up a configured version by name.
    pub fn version(&self, name: &str) -> Result<&VersionSource, ConfigError> {
        self.sources
            .versions
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| ConfigError::version_not_found(name))
    }

    /// Names of all configured versions, in navigation order.
    pub fn version_names(&self) -> Vec<String> {
        self.sources.versions.iter().map(|v| v.name.clone()).collect()
    }

    /// Get the effective output directory relative to a working directory.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        if self.storage.output_dir.is_absolute() {
            self.storage.output_dir.clone()
        } else {
            root.join(&self.storage.output_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert_eq!(config.sources.versions.len(), 6);
        assert_eq!(config.sources.versions[0].name, "v1");
        assert_eq!(config.sources.default_version, "v1");
        assert_eq!(config.naming.namespace_prefix, "microsoft.graph.");
        assert_eq!(config.naming.primitive_prefix, "Edm.");
        assert!(config.projection.include_inherited);
        assert_eq!(config.search.min_match_char_length, 3);
        assert_eq!(config.search.weights.name, 10.0);
        assert_eq!(config.refresh.interval_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = ExplorerConfig::default();
        let overrides = ConfigOverrides {
            output_dir: Some(PathBuf::from("/srv/www")),
            log_level: Some("debug".to_string()),
            interval_secs: Some(60),
            ..Default::default()
        };

        config.apply_overrides(&overrides);

        assert_eq!(config.storage.output_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.refresh.timeout_secs, 60);
    }

    #[test]
    fn test_output_dir_resolution() {
        let config = ExplorerConfig::default();
        let root = PathBuf::from("/home/user/project");
        assert_eq!(
            config.output_dir(&root),
            PathBuf::from("/home/user/project/site")
        );

        let mut config = ExplorerConfig::default();
        config.storage.output_dir = PathBuf::from("/var/www");
        assert_eq!(config.output_dir(&root), PathBuf::from("/var/www"));
    }

    #[test]
    fn test_version_lookup() {
        let config = ExplorerConfig::default();
        assert_eq!(
            config.version("beta").unwrap().location,
            "https://graph.microsoft.com/beta/$metadata"
        );
        assert!(matches!(
            config.version("gamma"),
            Err(ConfigError::VersionNotFound { .. })
        ));
        assert_eq!(
            config.version_names(),
            vec!["v1", "stagingv1", "cleanv1", "beta", "stagingbeta", "cleanbeta"]
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ExplorerConfig::default();
        config.search.threshold = 1.5;
        assert!(config.validate().unwrap_err().to_string().contains("search.threshold"));

        let mut config = ExplorerConfig::default();
        config.search.weights.members = 0.0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("search.weights.members"));

        let mut config = ExplorerConfig::default();
        config.sources.versions.push(VersionSource::new("v1", "x.xml"));
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));

        let mut config = ExplorerConfig::default();
        config.refresh.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = ExplorerConfig::default();
        config.refresh.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refresh.timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_unknown_default_version() {
        let mut config = ExplorerConfig::default();
        config.sources.default_version = "gamma".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sources.default_version"));
        assert!(err.to_string().contains("gamma"));

        config.sources.versions.push(VersionSource::new("gamma", "gamma.xml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sources_toml_roundtrip() {
        let config = SourcesConfig {
            default_version: "local".to_string(),
            versions: vec![VersionSource::new("local", "./metadata.xml")],
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: SourcesConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.versions, config.versions);
        assert_eq!(parsed.default_version, "local");
    }
}
