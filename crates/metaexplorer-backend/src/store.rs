//! Artifact storage.
//!
//! Every artifact is replaced wholesale on each write; readers never see a
//! partially written artifact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::BackendError;

/// Content type an artifact is served with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Javascript,
    Html,
    Css,
    Json,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Javascript => "text/javascript",
            ContentType::Html => "text/html",
            ContentType::Css => "text/css",
            ContentType::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named artifact storage.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Replace the artifact `name` with `content`.
    async fn put(
        &self,
        name: &str,
        content: &str,
        content_type: ContentType,
    ) -> Result<(), BackendError>;

    /// Read an artifact back, if it exists.
    async fn get(&self, name: &str) -> Result<Option<String>, BackendError>;
}

/// Artifact names are single path components without leading dots.
pub fn validate_artifact_name(name: &str) -> Result<(), BackendError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(BackendError::invalid_artifact_name(name))
    }
}

// ============================================================================
// File store
// ============================================================================

/// Stores artifacts as files in one directory.
///
/// Content is written to a hidden temporary file that is then renamed over
/// the artifact.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn put(
        &self,
        name: &str,
        content: &str,
        content_type: ContentType,
    ) -> Result<(), BackendError> {
        validate_artifact_name(name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BackendError::store(name, e))?;

        let target = self.path(name);
        let temp = self.root.join(format!(".{}.tmp", name));

        if let Err(e) = tokio::fs::write(&temp, content).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(BackendError::store(name, e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(BackendError::store(name, e));
        }

        debug!(
            "Stored {} ({}, {} bytes) at {:?}",
            name,
            content_type,
            content.len(),
            target
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>, BackendError> {
        validate_artifact_name(name)?;

        match tokio::fs::read_to_string(self.path(name)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// Keeps artifacts in memory, along with their content types.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<String, (ContentType, String)>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type an artifact was stored with.
    pub async fn content_type(&self, name: &str) -> Option<ContentType> {
        self.artifacts.read().await.get(name).map(|(ct, _)| *ct)
    }

    /// Names of all stored artifacts, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(
        &self,
        name: &str,
        content: &str,
        content_type: ContentType,
    ) -> Result<(), BackendError> {
        validate_artifact_name(name)?;
        trace!("Storing {} in memory", name);
        self.artifacts
            .write()
            .await
            .insert(name.to_string(), (content_type, content.to_string()));
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<String>, BackendError> {
        Ok(self
            .artifacts
            .read()
            .await
            .get(name)
            .map(|(_, text)| text.clone()))
    }
}
