//! MetaExplorer Backend - Sources, storage and the refresh pipeline
//!
//! This crate connects the producer to the outside world:
//! - [`SchemaSource`]: retrieval of raw schema documents over HTTP or from disk
//! - [`ArtifactStore`]: wholesale storage of generated artifacts
//! - [`Refresher`]: fetch, transform and store one snapshot per version, and
//!   publish the landing pages that load them
//!
//! ## Example
//!
//! ```ignore
//! use metaexplorer_backend::Refresher;
//! use metaexplorer_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let root = std::env::current_dir()?;
//!     let config = ConfigLoader::new().load(&root, None)?;
//!
//!     let refresher = Refresher::from_config(&config, &root)?;
//!     for outcome in refresher.refresh_all(&config.sources.versions).await {
//!         println!("{}: {}", outcome.version, outcome.is_ok());
//!     }
//!     refresher
//!         .publish_pages(&config.pages.title, &config.sources.versions)
//!         .await?;
//!     Ok(())
//! }
//! ```

mod error;
mod refresh;
pub mod settings;
mod source;
mod store;

pub use error::BackendError;
pub use refresh::{refresh_record_name, RefreshOutcome, RefreshSummary, Refresher};
pub use source::{
    is_remote, FileSchemaSource, HttpSchemaSource, LocationSource, SchemaSource,
    DEFAULT_TIMEOUT_SECS,
};
pub use store::{
    validate_artifact_name, ArtifactStore, ContentType, FileArtifactStore, MemoryArtifactStore,
};

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
