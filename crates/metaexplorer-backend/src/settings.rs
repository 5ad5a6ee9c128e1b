//! Mapping from configuration to library options.

use metaexplorer_config::ExplorerConfig;
use metaexplorer_core::{NameShortener, ProjectionOptions};
use metaexplorer_search::{KeyWeights, Renderer, SearchOptions};

/// Projection settings for the producer side.
pub fn projection_options(config: &ExplorerConfig) -> ProjectionOptions {
    ProjectionOptions {
        names: NameShortener::new(config.naming.namespace_prefix.clone()),
        include_inherited: config.projection.include_inherited,
    }
}

/// Index settings for the consumer side.
pub fn search_options(config: &ExplorerConfig) -> SearchOptions {
    let weights = &config.search.weights;
    SearchOptions {
        min_match_char_length: config.search.min_match_char_length,
        threshold: config.search.threshold,
        weights: KeyWeights {
            name: weights.name,
            base_type: weights.base_type,
            type_name: weights.type_name,
            property_name: weights.property_name,
            property_type: weights.property_type,
            members: weights.members,
        },
    }
}

/// Card renderer using the configured primitive prefix.
pub fn renderer(config: &ExplorerConfig) -> Renderer {
    Renderer::new(config.naming.primitive_prefix.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_line_up() {
        let config = ExplorerConfig::default();
        assert_eq!(projection_options(&config), ProjectionOptions::default());
        assert_eq!(search_options(&config), SearchOptions::default());
        assert_eq!(renderer(&config).primitive_prefix(), "Edm.");
    }

    #[test]
    fn test_custom_values_flow_through() {
        let mut config = ExplorerConfig::default();
        config.naming.namespace_prefix = "contoso.".to_string();
        config.projection.include_inherited = false;
        config.search.threshold = 0.25;
        config.search.weights.members = 4.0;

        let projection = projection_options(&config);
        assert_eq!(projection.names.namespace_prefix(), "contoso.");
        assert!(!projection.include_inherited);

        let search = search_options(&config);
        assert_eq!(search.threshold, 0.25);
        assert_eq!(search.weights.members, 4.0);
    }
}
