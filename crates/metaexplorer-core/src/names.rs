//! Type name shortening and primitive detection
//!
//! Display names drop the service namespace and abbreviate collection
//! markers: `Collection(microsoft.graph.user)` becomes `C(user)`.

use serde::{Deserialize, Serialize};

use crate::schema::COLLECTION_OPEN;

/// Default namespace prefix removed from type names.
pub const DEFAULT_NAMESPACE_PREFIX: &str = "microsoft.graph.";

/// Abbreviated collection marker used in display names.
pub const COLLECTION_ABBREVIATION: &str = "C(";

/// Default prefix identifying built-in primitive types.
pub const DEFAULT_PRIMITIVE_PREFIX: &str = "Edm.";

/// Rules for shortening type names before they are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameShortener {
    namespace_prefix: String,
}

impl Default for NameShortener {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE_PREFIX)
    }
}

impl NameShortener {
    pub fn new(namespace_prefix: impl Into<String>) -> Self {
        Self {
            namespace_prefix: namespace_prefix.into(),
        }
    }

    pub fn namespace_prefix(&self) -> &str {
        &self.namespace_prefix
    }

    /// Shorten a type name.
    ///
    /// Removes every occurrence of the namespace prefix and abbreviates every
    /// `Collection(` marker, repeating until the name no longer changes so
    /// that `shorten(shorten(x)) == shorten(x)`.
    pub fn shorten(&self, type_name: &str) -> String {
        let mut current = type_name.to_string();
        loop {
            let mut next = current.replace(COLLECTION_OPEN, COLLECTION_ABBREVIATION);
            if !self.namespace_prefix.is_empty() {
                next = next.replace(&self.namespace_prefix, "");
            }
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

/// Strip one abbreviated collection layer: `C(user)` → `user`.
pub fn unwrap_collection(type_name: &str) -> &str {
    type_name
        .strip_prefix(COLLECTION_ABBREVIATION)
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(type_name)
}

/// Whether a (shortened) type name denotes a built-in primitive.
///
/// Checked on the name itself and after unwrapping one collection layer.
pub fn is_primitive(type_name: &str, primitive_prefix: &str) -> bool {
    type_name.starts_with(primitive_prefix)
        || unwrap_collection(type_name).starts_with(primitive_prefix)
}
