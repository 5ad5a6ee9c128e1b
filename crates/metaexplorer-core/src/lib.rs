//! MetaExplorer Core - Schema metadata to interchange snapshots
//!
//! This crate provides the producer side of the explorer:
//! - CSDL schema document reading into a typed schema graph
//! - Projection of the graph into a flat display sequence
//! - Name shortening for display
//! - Serialization into the compact interchange text, and parsing it back
//!
//! # Example
//!
//! ```ignore
//! use metaexplorer_core::{transform, ProjectionOptions};
//!
//! let xml = std::fs::read_to_string("metadata.xml")?;
//! let snapshot = transform(&xml, &ProjectionOptions::default())?;
//! std::fs::write("v1.js", snapshot)?;
//! ```

pub mod csdl;
pub mod error;
pub mod interchange;
pub mod model;
pub mod names;
pub mod projector;
pub mod schema;

pub use csdl::read_csdl;
pub use error::{CsdlError, InterchangeError, ProjectionError, TransformError};
pub use interchange::{
    parse_interchange, serialize, InterchangeItem, InterchangeProperty, BINDING_NAME,
};
pub use model::{
    ComplexTypeItem, DisplayItem, EntityTypeItem, EnumTypeItem, ItemKind, Navigation, Property,
    TopLevelItem,
};
pub use names::{
    is_primitive, unwrap_collection, NameShortener, COLLECTION_ABBREVIATION,
    DEFAULT_NAMESPACE_PREFIX, DEFAULT_PRIMITIVE_PREFIX,
};
pub use projector::{project, ProjectionOptions, Projector};
pub use schema::{
    EntitySetDef, EnumTypeDef, NavigationPropertyDef, PropertyDef, SchemaEdge, SchemaGraph,
    SingletonDef, StructuredType, TypeGraph, TypeKind, TypeRef,
};

/// Read a schema document, project it and serialize the result.
///
/// Either the complete interchange text is returned or nothing is.
pub fn transform(xml: &str, options: &ProjectionOptions) -> Result<String, TransformError> {
    let schema = read_csdl(xml)?;
    let items = Projector::new(options.clone()).project(&schema)?;
    Ok(serialize(&items))
}
