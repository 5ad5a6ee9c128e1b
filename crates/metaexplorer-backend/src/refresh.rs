//! The per-version refresh pipeline.
//!
//! A refresh fetches one version's schema document, projects it and stores
//! the interchange text as `<version>.js`, followed by a `<version>.refresh.json`
//! record of when that happened. Versions are independent, so
//! [`Refresher::refresh_all`] runs them concurrently.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use metaexplorer_config::{ExplorerConfig, VersionSource};
use metaexplorer_core::{read_csdl, serialize, Projector, TransformError};
use metaexplorer_search::{
    client_script, render_page, snapshot_name, version_page, PageContext, PageState, Renderer,
    SearchOptions, CLIENT_SCRIPT_NAME, STYLESHEET, STYLESHEET_NAME,
};

use crate::error::BackendError;
use crate::settings::{projection_options, renderer, search_options};
use crate::source::{LocationSource, SchemaSource};
use crate::store::{ArtifactStore, ContentType, FileArtifactStore};

/// Artifact name of a version's refresh record.
pub fn refresh_record_name(version: &str) -> String {
    format!("{}.refresh.json", version)
}

/// Result of a successful refresh.
///
/// Stored next to the snapshot so later runs can show when it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub version: String,
    pub location: String,
    /// Name of the stored artifact
    pub artifact: String,
    /// Number of display items in the snapshot
    pub items: usize,
    pub bytes: usize,
    pub refreshed_at: DateTime<Utc>,
}

/// Result of refreshing one version as part of a batch.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub version: String,
    pub result: Result<RefreshSummary, BackendError>,
}

impl RefreshOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs refreshes against a schema source and an artifact store.
pub struct Refresher {
    source: Arc<dyn SchemaSource>,
    store: Arc<dyn ArtifactStore>,
    projector: Projector,
    search: SearchOptions,
    renderer: Renderer,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn SchemaSource>,
        store: Arc<dyn ArtifactStore>,
        projector: Projector,
    ) -> Self {
        Self {
            source,
            store,
            projector,
            search: SearchOptions::default(),
            renderer: Renderer::default(),
        }
    }

    /// Use these settings for the published browser client.
    pub fn with_client(mut self, search: SearchOptions, renderer: Renderer) -> Self {
        self.search = search;
        self.renderer = renderer;
        self
    }

    /// Build a refresher that reads configured locations and writes to the
    /// configured output directory.
    ///
    /// Relative file locations and the output directory resolve against
    /// `root`.
    pub fn from_config(config: &ExplorerConfig, root: &Path) -> Result<Self, BackendError> {
        let source = LocationSource::new(config.refresh.timeout_secs, root)?;
        let store = FileArtifactStore::new(config.output_dir(root));
        Ok(Self::new(
            Arc::new(source),
            Arc::new(store),
            Projector::new(projection_options(config)),
        )
        .with_client(search_options(config), renderer(config)))
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Refresh a single version.
    ///
    /// Nothing is stored unless the whole transformation succeeds; a previous
    /// artifact stays in place on failure. The refresh record is written after
    /// the snapshot.
    pub async fn refresh_version(
        &self,
        version: &str,
        location: &str,
    ) -> Result<RefreshSummary, BackendError> {
        debug!(
            "Refreshing {} from {} ({})",
            version,
            location,
            self.source.kind()
        );

        let xml = self.source.fetch(location).await?;
        let schema = read_csdl(&xml).map_err(TransformError::from)?;
        let items = self
            .projector
            .project(&schema)
            .map_err(TransformError::from)?;
        let text = serialize(&items);

        let artifact = snapshot_name(version);
        self.store
            .put(&artifact, &text, ContentType::Javascript)
            .await?;

        let summary = RefreshSummary {
            version: version.to_string(),
            location: location.to_string(),
            artifact,
            items: items.len(),
            bytes: text.len(),
            refreshed_at: Utc::now(),
        };
        let record = serde_json::to_string_pretty(&summary)?;
        self.store
            .put(&refresh_record_name(version), &record, ContentType::Json)
            .await?;

        info!(
            "Refreshed {}: {} items, {} bytes",
            version, summary.items, summary.bytes
        );
        Ok(summary)
    }

    /// Refresh every given version concurrently.
    ///
    /// Outcomes are returned in input order. A failing version does not
    /// affect the others.
    pub async fn refresh_all(&self, versions: &[VersionSource]) -> Vec<RefreshOutcome> {
        let futures = versions.iter().map(|v| async move {
            let result = self.refresh_version(&v.name, &v.location).await;
            if let Err(ref e) = result {
                warn!("Refresh of {} failed: {}", v.name, e);
            }
            RefreshOutcome {
                version: v.name.clone(),
                result,
            }
        });

        join_all(futures).await
    }

    /// Last successful refresh of a version, read from its stored record.
    ///
    /// A record that cannot be parsed is ignored.
    pub async fn last_refresh(
        &self,
        version: &str,
    ) -> Result<Option<RefreshSummary>, BackendError> {
        let name = refresh_record_name(version);
        let Some(text) = self.store.get(&name).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(summary) => Ok(Some(summary)),
            Err(e) => {
                warn!("Ignoring unreadable refresh record {}: {}", name, e);
                Ok(None)
            }
        }
    }

    /// Write a landing page per version, plus the stylesheet and the
    /// browser client.
    ///
    /// Every page links to all given versions and shows when its snapshot
    /// was last refreshed. Returns the artifact names written.
    pub async fn publish_pages(
        &self,
        title: &str,
        versions: &[VersionSource],
    ) -> Result<Vec<String>, BackendError> {
        let names: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
        let mut written = Vec::with_capacity(versions.len() + 2);

        self.store
            .put(STYLESHEET_NAME, STYLESHEET, ContentType::Css)
            .await?;
        written.push(STYLESHEET_NAME.to_string());

        let client = client_script(&self.search, &self.renderer);
        self.store
            .put(CLIENT_SCRIPT_NAME, &client, ContentType::Javascript)
            .await?;
        written.push(CLIENT_SCRIPT_NAME.to_string());

        for version in versions {
            let last_updated = self
                .last_refresh(&version.name)
                .await?
                .map(|s| s.refreshed_at);
            let context = PageContext {
                title,
                version: &version.name,
                last_updated,
                source: Some(&version.location),
            };
            let html = render_page(&context, &PageState::with_versions(names.iter().copied()));

            let artifact = version_page(&version.name);
            self.store.put(&artifact, &html, ContentType::Html).await?;
            written.push(artifact);
        }

        info!("Published {} pages", versions.len());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryArtifactStore;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Serves fixed documents by location.
    struct StaticSource(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl SchemaSource for StaticSource {
        async fn fetch(&self, location: &str) -> Result<String, BackendError> {
            self.0
                .get(location)
                .map(|s| s.to_string())
                .ok_or_else(|| BackendError::fetch(location, "unknown location"))
        }

        fn kind(&self) -> &'static str {
            "static"
        }
    }

    const SCHEMA: &str = r#"<Schema Namespace="microsoft.graph">
        <EnumType Name="color"><Member Name="red"/><Member Name="blue"/></EnumType>
    </Schema>"#;

    fn refresher(store: Arc<MemoryArtifactStore>) -> Refresher {
        let source = StaticSource(HashMap::from([
            ("good", SCHEMA),
            ("broken", "<Schema Namespace=\"x\"><EntityType>"),
        ]));
        Refresher::new(Arc::new(source), store, Projector::default())
    }

    #[tokio::test]
    async fn test_refresh_version_stores_snapshot() {
        let store = Arc::new(MemoryArtifactStore::new());
        let refresher = refresher(store.clone());

        let summary = refresher.refresh_version("v1", "good").await.unwrap();
        assert_eq!(summary.artifact, "v1.js");
        assert_eq!(summary.items, 1);

        let text = store.get("v1.js").await.unwrap().unwrap();
        assert!(text.starts_with("const json = [{\"ItemType\" : \"EnumType\""));
        assert_eq!(
            store.content_type("v1.js").await,
            Some(ContentType::Javascript)
        );
        assert_eq!(
            store.content_type("v1.refresh.json").await,
            Some(ContentType::Json)
        );
        assert_eq!(refresher.last_refresh("v1").await.unwrap(), Some(summary));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_artifact() {
        let store = Arc::new(MemoryArtifactStore::new());
        store
            .put("v1.js", "previous", ContentType::Javascript)
            .await
            .unwrap();
        let refresher = refresher(store.clone());

        let err = refresher.refresh_version("v1", "broken").await.unwrap_err();
        assert!(matches!(err, BackendError::Transform(_)));
        assert_eq!(store.get("v1.js").await.unwrap().as_deref(), Some("previous"));
        assert!(refresher.last_refresh("v1").await.unwrap().is_none());
        assert!(store.get("v1.refresh.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_record_outlives_refresher() {
        let store = Arc::new(MemoryArtifactStore::new());
        let summary = refresher(store.clone())
            .refresh_version("v1", "good")
            .await
            .unwrap();

        let later = refresher(store.clone());
        assert_eq!(later.last_refresh("v1").await.unwrap(), Some(summary));
        assert!(later.last_refresh("beta").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_refresh_record_is_ignored() {
        let store = Arc::new(MemoryArtifactStore::new());
        store
            .put("v1.refresh.json", "{not json", ContentType::Json)
            .await
            .unwrap();

        let refresher = refresher(store.clone());
        assert!(refresher.last_refresh("v1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_all_isolates_failures() {
        let store = Arc::new(MemoryArtifactStore::new());
        let refresher = refresher(store.clone());

        let outcomes = refresher
            .refresh_all(&[
                VersionSource::new("v1", "good"),
                VersionSource::new("beta", "missing"),
                VersionSource::new("cleanv1", "good"),
            ])
            .await;

        let summary: Vec<_> = outcomes
            .iter()
            .map(|o| (o.version.as_str(), o.is_ok()))
            .collect();
        assert_eq!(
            summary,
            vec![("v1", true), ("beta", false), ("cleanv1", true)]
        );
        assert_eq!(
            store.names().await,
            vec![
                "cleanv1.js",
                "cleanv1.refresh.json",
                "v1.js",
                "v1.refresh.json"
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_pages() {
        let store = Arc::new(MemoryArtifactStore::new());
        let summary = refresher(store.clone())
            .refresh_version("v1", "good")
            .await
            .unwrap();

        // A fresh refresher publishes, as `metaexplorer pages` does
        let refresher = refresher(store.clone());
        let versions = [
            VersionSource::new("v1", "good"),
            VersionSource::new("beta", "good"),
        ];
        let written = refresher
            .publish_pages("Graph Metadata Explorer", &versions)
            .await
            .unwrap();
        assert_eq!(written, vec!["main.css", "main.js", "v1.html", "beta.html"]);

        let client = store.get("main.js").await.unwrap().unwrap();
        assert!(client.contains("\"minMatchCharLength\":3"));
        assert_eq!(
            store.content_type("main.js").await,
            Some(ContentType::Javascript)
        );

        let v1 = store.get("v1.html").await.unwrap().unwrap();
        assert!(v1.contains("<script src=\"v1.js\"></script>"));
        assert!(v1.contains("<script src=\"main.js\"></script>"));
        assert!(v1.contains(&format!(
            "Last Updated <time datetime=\"{}\">",
            summary
                .refreshed_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        )));
        assert!(v1.contains("href=\"beta.html\""));

        // Never refreshed, so no timestamp
        let beta = store.get("beta.html").await.unwrap().unwrap();
        assert!(!beta.contains("Last Updated"));
        assert_eq!(store.content_type("beta.html").await, Some(ContentType::Html));
    }
}
