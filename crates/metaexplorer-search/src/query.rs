//! Query/render engine
//!
//! Pairs a built [`SearchIndex`] with a [`Renderer`] and answers the two
//! query modes:
//!
//! - fuzzy search through the index
//! - exact lookup by `Name`, bypassing the index

use tracing::debug;

use metaexplorer_core::InterchangeItem;

use crate::index::{SearchHit, SearchIndex};
use crate::navigation::NavigationState;
use crate::render::Renderer;

/// Answers queries against one snapshot.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: SearchIndex,
    renderer: Renderer,
}

impl QueryEngine {
    pub fn new(index: SearchIndex, renderer: Renderer) -> Self {
        Self { index, renderer }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Ranked fuzzy matches for `query`.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        self.index.search(query)
    }

    /// Items named exactly `name`.
    pub fn lookup(&self, name: &str) -> Vec<&InterchangeItem> {
        self.index.lookup(name)
    }

    pub fn render_search(&self, query: &str) -> String {
        let hits = self.search(query);
        self.renderer.render_items(hits.iter().map(|hit| hit.item))
    }

    pub fn render_lookup(&self, name: &str) -> String {
        self.renderer.render_items(self.lookup(name))
    }

    /// Render the results a navigation state calls for.
    ///
    /// Returns `None` for [`NavigationState::Idle`], which has no render
    /// action.
    pub fn render(&self, state: &NavigationState) -> Option<String> {
        let html = match state {
            NavigationState::ExactLookup(name) => self.render_lookup(name),
            NavigationState::FuzzySearch(term) => self.render_search(term),
            NavigationState::Idle => return None,
        };
        debug!(%state, bytes = html.len(), "Rendered results");
        Some(html)
    }
}
