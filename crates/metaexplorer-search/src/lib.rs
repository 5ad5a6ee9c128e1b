//! MetaExplorer Search - Exploring interchange snapshots
//!
//! This crate provides the consumer side of the explorer:
//!
//! - **Index**: a weighted, case-insensitive fuzzy index built once per snapshot
//! - **Query**: fuzzy search and exact lookup by name
//! - **Render**: HTML cards for matched items, with links between types
//! - **Navigation**: the URL fragment as the single source of render truth
//!
//! # Example
//!
//! ```ignore
//! use metaexplorer_search::{
//!     ExplorerSession, PageState, QueryEngine, Renderer, SearchIndex, SearchOptions,
//! };
//!
//! let snapshot = std::fs::read_to_string("out/v1.js")?;
//! let index = SearchIndex::from_snapshot(&snapshot, SearchOptions::default())?;
//! let engine = QueryEngine::new(index, Renderer::default());
//!
//! let mut session = ExplorerSession::bootstrap(engine, PageState::default(), "#type:user");
//! session.on_input("message");
//! println!("{}", session.sink().results);
//! ```

pub mod error;
pub mod fuzzy;
pub mod index;
pub mod navigation;
pub mod page;
pub mod query;
pub mod render;
pub mod session;

pub use error::{Result, SearchError};
pub use index::{IndexKey, KeyWeights, SearchHit, SearchIndex, SearchOptions};
pub use navigation::NavigationState;
pub use page::{
    client_options, client_script, render_page, snapshot_name, PageContext, CLIENT_SCRIPT_NAME,
    STYLESHEET, STYLESHEET_NAME, TIMESTAMP_FORMAT,
};
pub use query::QueryEngine;
pub use render::{escape_html, Renderer};
pub use session::{version_page, ExplorerSession, PageState, RenderSink, VersionLink};
