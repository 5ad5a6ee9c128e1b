//! Error types for metaexplorer-search

use metaexplorer_core::InterchangeError;
use thiserror::Error;

/// Errors that can occur while building or querying a search index
#[derive(Error, Debug)]
pub enum SearchError {
    /// The snapshot text could not be read back
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] InterchangeError),

    /// A key weight is not a positive finite number
    #[error("Invalid weight for key '{key}': {weight}")]
    InvalidWeight { key: &'static str, weight: f64 },

    /// Threshold outside `0.0..=1.0`
    #[error("Invalid threshold {0}: must be between 0.0 and 1.0")]
    InvalidThreshold(f64),

    /// Minimum match length of zero
    #[error("Minimum match length must be at least 1")]
    InvalidMinMatch,
}

impl SearchError {
    pub fn invalid_weight(key: &'static str, weight: f64) -> Self {
        Self::InvalidWeight { key, weight }
    }
}

/// Result type for metaexplorer-search operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::invalid_weight("Name", -1.0);
        assert_eq!(err.to_string(), "Invalid weight for key 'Name': -1");

        let err = SearchError::InvalidThreshold(1.5);
        assert!(err.to_string().contains("1.5"));

        let err: SearchError = InterchangeError::MissingTerminator.into();
        assert!(err.to_string().starts_with("Invalid snapshot"));
    }
}
