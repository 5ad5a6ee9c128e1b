//! Schema document retrieval.
//!
//! A [`SchemaSource`] turns a configured location into the raw CSDL text.
//! Locations starting with `http://` or `https://` are fetched over HTTP;
//! everything else (including `file://` URLs) is read from disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, trace};

use crate::error::BackendError;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Source of raw schema documents.
///
/// Failures are returned to the caller as-is. Retrying is left to whoever
/// schedules refreshes.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Retrieve the schema document at `location`.
    async fn fetch(&self, location: &str) -> Result<String, BackendError>;

    /// Short name of the source kind, for logs.
    fn kind(&self) -> &'static str;
}

/// Whether a location is fetched over HTTP.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ============================================================================
// HTTP
// ============================================================================

/// Fetches schema documents with a GET request.
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    client: Client,
    timeout_secs: u64,
}

impl HttpSchemaSource {
    /// Create a source whose requests time out after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::with_context("HTTP client", e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch(&self, location: &str) -> Result<String, BackendError> {
        debug!("Fetching schema from {}", location);

        let response = self.client.get(location).send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::fetch(location, "request timed out")
            } else if e.is_connect() {
                BackendError::fetch(location, format!("connection failed: {}", e))
            } else {
                BackendError::fetch(location, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::http_status(location, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::fetch(location, format!("invalid body: {}", e)))?;
        trace!("Fetched {} bytes from {}", body.len(), location);
        Ok(body)
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}

// ============================================================================
// File
// ============================================================================

/// Reads schema documents from disk.
///
/// Relative locations are resolved against the base directory, if one is set.
#[derive(Debug, Clone, Default)]
pub struct FileSchemaSource {
    base_dir: Option<PathBuf>,
}

impl FileSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Path a location refers to.
    pub fn resolve(&self, location: &str) -> PathBuf {
        let raw = location.strip_prefix("file://").unwrap_or(location);
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl SchemaSource for FileSchemaSource {
    async fn fetch(&self, location: &str) -> Result<String, BackendError> {
        let path = self.resolve(location);
        debug!("Reading schema from {:?}", path);

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BackendError::schema_not_found(path))
            }
            Err(e) => Err(BackendError::fetch(location, e)),
        }
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

// ============================================================================
// Dispatch by location
// ============================================================================

/// Picks HTTP or file retrieval per location.
#[derive(Debug, Clone)]
pub struct LocationSource {
    http: HttpSchemaSource,
    file: FileSchemaSource,
}

impl LocationSource {
    pub fn new(timeout_secs: u64, base_dir: impl Into<PathBuf>) -> Result<Self, BackendError> {
        Ok(Self {
            http: HttpSchemaSource::new(timeout_secs)?,
            file: FileSchemaSource::with_base_dir(base_dir),
        })
    }
}

#[async_trait]
impl SchemaSource for LocationSource {
    async fn fetch(&self, location: &str) -> Result<String, BackendError> {
        if is_remote(location) {
            self.http.fetch(location).await
        } else {
            self.file.fetch(location).await
        }
    }

    fn kind(&self) -> &'static str {
        "location"
    }
}
