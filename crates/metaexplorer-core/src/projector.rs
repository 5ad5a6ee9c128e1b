//! Graph projector
//!
//! Walks a [`SchemaGraph`] and produces the flat display sequence in a fixed
//! pass order:
//!
//! 1. entity sets
//! 2. singletons
//! 3. entity types, then complex types
//! 4. enumerations
//!
//! Declaration order is preserved within each pass. For structured types all
//! structural properties precede all navigation properties.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProjectionError;
use crate::model::{
    ComplexTypeItem, DisplayItem, EntityTypeItem, EnumTypeItem, Property, TopLevelItem,
};
use crate::names::NameShortener;
use crate::schema::{SchemaGraph, StructuredType, TypeGraph, TypeKind};

/// Settings for a projection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Name-shortening rules applied to every emitted type name
    pub names: NameShortener,
    /// List properties inherited through the base-type chain
    pub include_inherited: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            names: NameShortener::default(),
            include_inherited: true,
        }
    }
}

/// Projects schema graphs into display items.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    options: ProjectionOptions,
}

impl Projector {
    pub fn new(options: ProjectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    /// Project the whole schema.
    ///
    /// Fails without partial output when a structured declaration has a kind
    /// other than entity or complex.
    pub fn project(&self, schema: &SchemaGraph) -> Result<Vec<DisplayItem>, ProjectionError> {
        let names = &self.options.names;
        let types = schema.type_graph();
        let mut items = Vec::with_capacity(
            schema.entity_sets.len()
                + schema.singletons.len()
                + schema.structured_types.len()
                + schema.enum_types.len(),
        );

        for set in &schema.entity_sets {
            let full_name = set.type_ref().full_name();
            items.push(DisplayItem::EntitySet(TopLevelItem {
                name: set.name.clone(),
                type_name: names.shorten(&full_name),
                full_name,
            }));
        }

        for singleton in &schema.singletons {
            let full_name = singleton.type_ref().full_name();
            items.push(DisplayItem::Singleton(TopLevelItem {
                name: singleton.name.clone(),
                type_name: names.shorten(&full_name),
                full_name,
            }));
        }

        if let Some(ty) = schema
            .structured_types
            .iter()
            .find(|t| !matches!(t.kind, TypeKind::Entity | TypeKind::Complex))
        {
            return Err(ProjectionError::UnsupportedTypeKind {
                type_name: ty.full_name(),
                kind: ty.kind,
            });
        }

        let by_name = schema.structured_by_name();
        for kind in [TypeKind::Entity, TypeKind::Complex] {
            for ty in schema.structured_types.iter().filter(|t| t.kind == kind) {
                items.push(self.project_structured(ty, &by_name, &types));
            }
        }

        for ty in &schema.enum_types {
            let full_name = ty.full_name();
            items.push(DisplayItem::EnumType(EnumTypeItem {
                name: names.shorten(&full_name),
                full_name,
                members: ty.members.clone(),
            }));
        }

        debug!(items = items.len(), "Projected schema graph");
        Ok(items)
    }

    fn project_structured(
        &self,
        ty: &StructuredType,
        by_name: &HashMap<String, &StructuredType>,
        types: &TypeGraph,
    ) -> DisplayItem {
        let names = &self.options.names;
        let full_name = ty.full_name();
        let name = names.shorten(&full_name);
        let base_type = ty.base_type.as_deref().map(|b| names.shorten(b));

        // Root-most ancestor first, the type itself last
        let mut chain: Vec<&StructuredType> = Vec::new();
        if self.options.include_inherited {
            chain.extend(
                types
                    .ancestors(&full_name)
                    .iter()
                    .filter_map(|a| by_name.get(a).copied()),
            );
        }
        chain.push(ty);

        let mut properties: Vec<Property> = chain
            .iter()
            .flat_map(|t| t.properties.iter())
            .map(|p| Property::structural(&p.name, names.shorten(&p.type_ref.full_name())))
            .collect();

        match ty.kind {
            TypeKind::Entity => {
                properties.extend(
                    chain
                        .iter()
                        .flat_map(|t| t.navigation_properties.iter())
                        .map(|n| {
                            Property::navigation(
                                &n.name,
                                names.shorten(&n.type_ref.full_name()),
                                n.contains_target,
                                n.is_collection(),
                            )
                        }),
                );
                DisplayItem::EntityType(EntityTypeItem {
                    name,
                    full_name,
                    is_abstract: ty.is_abstract,
                    base_type,
                    properties,
                })
            }
            _ => {
                // Complex types list relationships as plain properties
                properties.extend(
                    chain
                        .iter()
                        .flat_map(|t| t.navigation_properties.iter())
                        .map(|n| {
                            Property::structural(&n.name, names.shorten(&n.type_ref.full_name()))
                        }),
                );
                DisplayItem::ComplexType(ComplexTypeItem {
                    name,
                    full_name,
                    base_type,
                    properties,
                })
            }
        }
    }
}

/// Project a schema with the given options.
pub fn project(
    schema: &SchemaGraph,
    options: &ProjectionOptions,
) -> Result<Vec<DisplayItem>, ProjectionError> {
    Projector::new(options.clone()).project(schema)
}
