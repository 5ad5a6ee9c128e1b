//! Search index over a loaded snapshot
//!
//! The index is built once from the parsed interchange array and is
//! read-only afterwards. Each item contributes the values of six weighted
//! keys:
//!
//! | Key | Default weight |
//! |-----|----------------|
//! | `Name` | 10 |
//! | `BaseType` | 2 |
//! | `Type` | 2 |
//! | `Properties.Name` | 1 |
//! | `Properties.Type` | 1 |
//! | `Members` | 1 |
//!
//! ## Scoring
//!
//! Every value that matches the query contributes
//! `max(score, ε) ^ (weight × norm)` to the item's total, where `weight` is
//! the key weight divided by the sum of all weights and `norm` is
//! `1 / sqrt(token count)` of the value. Totals are multiplied together; the
//! product is accumulated as a sum of logarithms. Lower totals rank higher.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use metaexplorer_core::{parse_interchange, InterchangeItem};

use crate::error::{Result, SearchError};
use crate::fuzzy::{fold, Pattern};

// ============================================================================
// Keys
// ============================================================================

/// A searchable field of an interchange item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexKey {
    Name,
    BaseType,
    Type,
    PropertyName,
    PropertyType,
    Members,
}

impl IndexKey {
    pub const ALL: [IndexKey; 6] = [
        IndexKey::Name,
        IndexKey::BaseType,
        IndexKey::Type,
        IndexKey::PropertyName,
        IndexKey::PropertyType,
        IndexKey::Members,
    ];

    /// Path of the key in the interchange object.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKey::Name => "Name",
            IndexKey::BaseType => "BaseType",
            IndexKey::Type => "Type",
            IndexKey::PropertyName => "Properties.Name",
            IndexKey::PropertyType => "Properties.Type",
            IndexKey::Members => "Members",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }

    /// All values of this key on `item`, in order.
    pub fn values<'a>(&self, item: &'a InterchangeItem) -> Vec<&'a str> {
        match self {
            IndexKey::Name => vec![item.name.as_str()],
            IndexKey::BaseType => item.base_type.as_deref().into_iter().collect(),
            IndexKey::Type => item.type_name.as_deref().into_iter().collect(),
            IndexKey::PropertyName => item
                .properties
                .iter()
                .flatten()
                .map(|p| p.name.as_str())
                .collect(),
            IndexKey::PropertyType => item
                .properties
                .iter()
                .flatten()
                .map(|p| p.type_name.as_str())
                .collect(),
            IndexKey::Members => item
                .members
                .iter()
                .flatten()
                .map(String::as_str)
                .collect(),
        }
    }
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Options
// ============================================================================

/// Relative importance of each key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyWeights {
    pub name: f64,
    pub base_type: f64,
    pub type_name: f64,
    pub property_name: f64,
    pub property_type: f64,
    pub members: f64,
}

impl Default for KeyWeights {
    fn default() -> Self {
        Self {
            name: 10.0,
            base_type: 2.0,
            type_name: 2.0,
            property_name: 1.0,
            property_type: 1.0,
            members: 1.0,
        }
    }
}

impl KeyWeights {
    pub fn get(&self, key: IndexKey) -> f64 {
        match key {
            IndexKey::Name => self.name,
            IndexKey::BaseType => self.base_type,
            IndexKey::Type => self.type_name,
            IndexKey::PropertyName => self.property_name,
            IndexKey::PropertyType => self.property_type,
            IndexKey::Members => self.members,
        }
    }

    /// Weights divided by their sum, indexed by key.
    fn normalized(&self) -> Result<[f64; 6]> {
        let mut total = 0.0;
        for key in IndexKey::ALL {
            let weight = self.get(key);
            if !weight.is_finite() || weight <= 0.0 {
                return Err(SearchError::invalid_weight(key.as_str(), weight));
            }
            total += weight;
        }

        let mut out = [0.0; 6];
        for key in IndexKey::ALL {
            out[key.slot()] = self.get(key) / total;
        }
        Ok(out)
    }
}

/// Matching behaviour of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Queries and matched regions shorter than this never match
    pub min_match_char_length: usize,
    /// Tolerated fraction of edit errors (0.0 = exact substring)
    pub threshold: f64,
    pub weights: KeyWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_match_char_length: 3,
            threshold: 0.0,
            weights: KeyWeights::default(),
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.min_match_char_length == 0 {
            return Err(SearchError::InvalidMinMatch);
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidThreshold(self.threshold));
        }
        self.weights.normalized().map(|_| ())
    }
}

// ============================================================================
// Index
// ============================================================================

#[derive(Debug, Clone)]
struct IndexedValue {
    key: IndexKey,
    text: Vec<char>,
    norm: f64,
}

/// A ranked match.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// Position of the item in the snapshot
    pub position: usize,
    pub item: &'a InterchangeItem,
    /// Combined score in `[0, 1]`; 0.0 is a perfect match
    pub score: f64,
    /// Keys that contributed at least one matching value
    pub matched_keys: Vec<IndexKey>,
    log_score: f64,
}

impl SearchHit<'_> {
    pub fn matched(&self, key: IndexKey) -> bool {
        self.matched_keys.contains(&key)
    }
}

/// Immutable fuzzy index over one snapshot.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    items: Vec<InterchangeItem>,
    records: Vec<Vec<IndexedValue>>,
    weights: [f64; 6],
    options: SearchOptions,
}

impl SearchIndex {
    /// Build the index over `items`.
    pub fn build(items: Vec<InterchangeItem>, options: SearchOptions) -> Result<Self> {
        options.validate()?;
        let weights = options.weights.normalized()?;

        let records: Vec<Vec<IndexedValue>> = items
            .iter()
            .map(|item| {
                IndexKey::ALL
                    .iter()
                    .flat_map(|&key| {
                        key.values(item).into_iter().map(move |value| IndexedValue {
                            key,
                            text: fold(value),
                            norm: field_norm(value),
                        })
                    })
                    .collect()
            })
            .collect();

        debug!(
            items = items.len(),
            values = records.iter().map(Vec::len).sum::<usize>(),
            "Built search index"
        );

        Ok(Self {
            items,
            records,
            weights,
            options,
        })
    }

    /// Parse snapshot text and build the index over it.
    pub fn from_snapshot(text: &str, options: SearchOptions) -> Result<Self> {
        let items = parse_interchange(text)?;
        Self::build(items, options)
    }

    pub fn items(&self) -> &[InterchangeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Fuzzy search, best matches first.
    ///
    /// Blank queries and queries shorter than the minimum match length return
    /// nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.trim();
        if query.chars().count() < self.options.min_match_char_length {
            trace!(query, "Query below minimum match length");
            return Vec::new();
        }

        let pattern = Pattern::new(query, self.options.threshold);
        let mut hits: Vec<SearchHit<'_>> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(position, values)| self.score_record(&pattern, position, values))
            .collect();

        // Stable: equal scores keep snapshot order
        hits.sort_by(|a, b| a.log_score.total_cmp(&b.log_score));

        debug!(query, hits = hits.len(), "Fuzzy search");
        hits
    }

    fn score_record<'a>(
        &'a self,
        pattern: &Pattern,
        position: usize,
        values: &[IndexedValue],
    ) -> Option<SearchHit<'a>> {
        let mut log_score = 0.0;
        let mut matched_keys: Vec<IndexKey> = Vec::new();

        for value in values {
            let Some(found) = pattern.find_in(&value.text) else {
                continue;
            };
            if found.matched_len < self.options.min_match_char_length {
                continue;
            }
            let exponent = self.weights[value.key.slot()] * value.norm;
            log_score += found.score.max(f64::EPSILON).ln() * exponent;
            if !matched_keys.contains(&value.key) {
                matched_keys.push(value.key);
            }
        }

        if matched_keys.is_empty() {
            return None;
        }
        matched_keys.sort();

        Some(SearchHit {
            position,
            item: &self.items[position],
            score: log_score.exp(),
            matched_keys,
            log_score,
        })
    }

    /// Items whose `Name` equals `name` exactly, in snapshot order.
    pub fn lookup(&self, name: &str) -> Vec<&InterchangeItem> {
        self.items.iter().filter(|item| item.name == name).collect()
    }
}

/// `1 / sqrt(tokens)`, rounded to three decimals.
fn field_norm(value: &str) -> f64 {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count().max(1);
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}
