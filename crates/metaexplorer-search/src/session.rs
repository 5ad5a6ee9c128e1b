//! Explorer session: the fragment-driven state machine
//!
//! The session owns the current URL fragment. Every change to it (including
//! the one produced by typing in the search box) is handled the same way:
//!
//! 1. derive the [`NavigationState`] from the fragment
//! 2. rewrite the version navigation links to carry the fragment
//! 3. render results and update the search box, unless the state is idle
//!
//! Input never renders directly. Setting the fragment to its current value
//! raises no change, as in a browser.

use tracing::debug;

use crate::navigation::NavigationState;
use crate::query::QueryEngine;

/// The page surface a session renders into.
pub trait RenderSink {
    /// Replace the contents of the results container.
    fn show_results(&mut self, html: &str);

    /// Set the value of the search box.
    fn set_search_text(&mut self, text: &str);

    /// Point every version link at the same fragment of its own page.
    fn rewrite_version_links(&mut self, fragment: &str);
}

/// A link to the same view of another schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLink {
    pub version: String,
    pub href: String,
}

/// In-memory page used outside a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub results: String,
    pub search_text: String,
    pub version_links: Vec<VersionLink>,
    versions: Vec<String>,
}

impl PageState {
    /// A blank page linking to the given versions.
    pub fn with_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let versions: Vec<String> = versions.into_iter().map(Into::into).collect();
        let mut page = Self {
            versions,
            ..Default::default()
        };
        page.rewrite_version_links("");
        page
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }
}

/// Page file name for a version.
pub fn version_page(version: &str) -> String {
    format!("{}.html", version)
}

impl RenderSink for PageState {
    fn show_results(&mut self, html: &str) {
        self.results = html.to_string();
    }

    fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    fn rewrite_version_links(&mut self, fragment: &str) {
        self.version_links = self
            .versions
            .iter()
            .map(|version| VersionLink {
                version: version.clone(),
                href: format!("{}{}", version_page(version), fragment),
            })
            .collect();
    }
}

/// One open explorer page.
pub struct ExplorerSession<S: RenderSink> {
    engine: QueryEngine,
    sink: S,
    fragment: String,
    state: NavigationState,
}

impl<S: RenderSink> ExplorerSession<S> {
    /// Open a page at `fragment` and run the startup transition.
    pub fn bootstrap(engine: QueryEngine, sink: S, fragment: &str) -> Self {
        let mut session = Self {
            engine,
            sink,
            fragment: normalize(fragment),
            state: NavigationState::Idle,
        };
        session.on_fragment_change();
        session
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Navigate to `fragment`.
    ///
    /// Returns whether the fragment changed (and a transition ran).
    pub fn set_fragment(&mut self, fragment: &str) -> bool {
        let fragment = normalize(fragment);
        if fragment == self.fragment {
            return false;
        }
        self.fragment = fragment;
        self.on_fragment_change();
        true
    }

    /// The search box value changed.
    pub fn on_input(&mut self, value: &str) -> bool {
        let target = NavigationState::FuzzySearch(value.to_string());
        self.set_fragment(&target.to_fragment())
    }

    /// The commit key was pressed in the search box.
    pub fn on_commit(&mut self, value: &str) -> bool {
        self.on_input(value)
    }

    fn on_fragment_change(&mut self) {
        self.state = NavigationState::from_fragment(&self.fragment);
        debug!(fragment = %self.fragment, state = %self.state, "Fragment changed");

        self.sink.rewrite_version_links(&self.fragment);

        if let Some(html) = self.engine.render(&self.state) {
            self.sink.show_results(&html);
        }
        if let Some(text) = self.state.search_text() {
            self.sink.set_search_text(text);
        }
    }
}

/// Fragments are stored with their leading `#`; a bare `#` is no fragment.
fn normalize(fragment: &str) -> String {
    match fragment.trim_start_matches('#') {
        "" => String::new(),
        rest => format!("#{}", rest),
    }
}
