//! URL fragment navigation state
//!
//! The fragment is the only input to rendering:
//!
//! - `#type:<Name>` → exact lookup of `<Name>`
//! - `#search:<term>` → fuzzy search for `<term>`
//! - anything else → idle
//!
//! Values are percent-decoded when read and percent-encoded when written.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

const TYPE_PREFIX: &str = "type:";
const SEARCH_PREFIX: &str = "search:";

/// What the page should show, derived from the URL fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NavigationState {
    /// Render the item(s) named exactly this
    ExactLookup(String),
    /// Render fuzzy matches for this term
    FuzzySearch(String),
    #[default]
    Idle,
}

impl NavigationState {
    /// Derive the state from a fragment, with or without the leading `#`.
    pub fn from_fragment(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if let Some(name) = fragment.strip_prefix(TYPE_PREFIX) {
            NavigationState::ExactLookup(decode(name))
        } else if let Some(term) = fragment.strip_prefix(SEARCH_PREFIX) {
            NavigationState::FuzzySearch(decode(term))
        } else {
            NavigationState::Idle
        }
    }

    /// The fragment (including `#`) that leads to this state.
    ///
    /// `Idle` maps to the empty fragment.
    pub fn to_fragment(&self) -> String {
        match self {
            NavigationState::ExactLookup(name) => {
                format!("#{}{}", TYPE_PREFIX, urlencoding::encode(name))
            }
            NavigationState::FuzzySearch(term) => {
                format!("#{}{}", SEARCH_PREFIX, urlencoding::encode(term))
            }
            NavigationState::Idle => String::new(),
        }
    }

    /// Text the search box shows in this state.
    pub fn search_text(&self) -> Option<&str> {
        match self {
            NavigationState::ExactLookup(text) | NavigationState::FuzzySearch(text) => Some(text),
            NavigationState::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, NavigationState::Idle)
    }
}

impl std::fmt::Display for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationState::ExactLookup(name) => write!(f, "lookup '{}'", name),
            NavigationState::FuzzySearch(term) => write!(f, "search '{}'", term),
            NavigationState::Idle => f.write_str("idle"),
        }
    }
}

/// Percent-decode, keeping the raw text when it is not valid UTF-8.
fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .unwrap_or(Cow::Borrowed(raw))
        .into_owned()
}
