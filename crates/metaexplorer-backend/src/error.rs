//! Backend error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during backend operations.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Schema document could not be transformed
    #[error("transform failed: {0}")]
    Transform(#[from] metaexplorer_core::TransformError),

    /// Search index could not be built
    #[error("search failed: {0}")]
    Search(#[from] metaexplorer_search::SearchError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] metaexplorer_config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Refresh record could not be encoded
    #[error("refresh record error: {0}")]
    Record(#[from] serde_json::Error),

    /// Schema document could not be retrieved
    #[error("failed to fetch schema from '{location}': {message}")]
    Fetch { location: String, message: String },

    /// Schema source answered with a non-success status
    #[error("schema source '{location}' returned HTTP {status}")]
    HttpStatus { location: String, status: u16 },

    /// Local schema document does not exist
    #[error("schema document not found at '{path}'")]
    SchemaNotFound { path: PathBuf },

    /// Artifact names are flat file names
    #[error("invalid artifact name '{name}'")]
    InvalidArtifactName { name: String },

    /// Artifact could not be written
    #[error("failed to store artifact '{name}': {source}")]
    Store {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl BackendError {
    /// Create a Fetch error.
    pub fn fetch(location: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Fetch {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create an HttpStatus error.
    pub fn http_status(location: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            location: location.into(),
            status,
        }
    }

    /// Create a SchemaNotFound error.
    pub fn schema_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SchemaNotFound { path: path.into() }
    }

    /// Create an InvalidArtifactName error.
    pub fn invalid_artifact_name(name: impl Into<String>) -> Self {
        Self::InvalidArtifactName { name: name.into() }
    }

    /// Create a Store error.
    pub fn store(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Store {
            name: name.into(),
            source,
        }
    }

    /// Add context to any error.
    pub fn with_context(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: message.into(),
        }
    }
}
