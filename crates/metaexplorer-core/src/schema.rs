//! Schema graph model
//!
//! In-memory representation of a parsed service schema: structured types
//! (entities and complex types), enumerations, and the entity container's
//! entity sets and singletons. All type names are fully qualified; aliases
//! have already been resolved by the reader.
//!
//! The [`TypeGraph`] view exposes inheritance and navigation relationships
//! between structured types as a petgraph graph.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Literal that opens a collection type reference.
pub const COLLECTION_OPEN: &str = "Collection(";

// ============================================================================
// Type References
// ============================================================================

/// Reference to a type, as written on a property or container element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Fully qualified element type name (e.g., `microsoft.graph.user`).
    pub name: String,
    /// Whether the reference is `Collection(...)` of the element type.
    pub is_collection: bool,
}

impl TypeRef {
    /// Reference to a single-valued type.
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_collection: false,
        }
    }

    /// Reference to a collection of `name`.
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_collection: true,
        }
    }

    /// Parse a type reference string, recognising one `Collection(...)` layer.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw
            .strip_prefix(COLLECTION_OPEN)
            .and_then(|inner| inner.strip_suffix(')'))
        {
            Some(inner) => Self::collection(inner.trim()),
            None => Self::single(raw),
        }
    }

    /// Full type name, with the collection wrapper when multi-valued.
    pub fn full_name(&self) -> String {
        if self.is_collection {
            format!("{}{})", COLLECTION_OPEN, self.name)
        } else {
            self.name.clone()
        }
    }
}

// ============================================================================
// Structured Types
// ============================================================================

/// Kind of a declared type, mirroring the EDM type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Entity,
    Complex,
    Primitive,
    Enum,
    Collection,
    TypeDefinition,
    Untyped,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Entity => "Entity",
            TypeKind::Complex => "Complex",
            TypeKind::Primitive => "Primitive",
            TypeKind::Enum => "Enum",
            TypeKind::Collection => "Collection",
            TypeKind::TypeDefinition => "TypeDefinition",
            TypeKind::Untyped => "Untyped",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural (non-navigation) property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub type_ref: TypeRef,
}

/// A navigation property: a relationship to another structured type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPropertyDef {
    pub name: String,
    pub type_ref: TypeRef,
    /// Whether the owner controls the lifetime of the target.
    pub contains_target: bool,
}

impl NavigationPropertyDef {
    /// Whether the relationship is multi-valued.
    pub fn is_collection(&self) -> bool {
        self.type_ref.is_collection
    }
}

/// A declared entity or complex type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredType {
    pub kind: TypeKind,
    pub namespace: String,
    pub name: String,
    /// Fully qualified base type name
    pub base_type: Option<String>,
    pub is_abstract: bool,
    /// Declared structural properties, in document order
    pub properties: Vec<PropertyDef>,
    /// Declared navigation properties, in document order
    pub navigation_properties: Vec<NavigationPropertyDef>,
}

impl StructuredType {
    /// Create an empty structured type of the given kind.
    pub fn new(kind: TypeKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
            base_type: None,
            is_abstract: false,
            properties: Vec::new(),
            navigation_properties: Vec::new(),
        }
    }

    /// Fully qualified name (`namespace.name`).
    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }
}

/// A declared enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeDef {
    pub namespace: String,
    pub name: String,
    pub members: Vec<String>,
}

impl EnumTypeDef {
    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }
}

// ============================================================================
// Entity Container
// ============================================================================

/// A top-level entity set: a collection of entities of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySetDef {
    pub name: String,
    /// Fully qualified entity type name
    pub entity_type: String,
}

impl EntitySetDef {
    /// The set's type: a collection of its entity type.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::collection(&self.entity_type)
    }
}

/// A top-level singleton: one named instance of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingletonDef {
    pub name: String,
    /// Fully qualified entity type name
    pub entity_type: String,
}

impl SingletonDef {
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::single(&self.entity_type)
    }
}

// ============================================================================
// Schema Graph
// ============================================================================

/// A parsed schema document.
///
/// Declaration order is preserved in every list, across all `Schema`
/// elements of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaGraph {
    pub structured_types: Vec<StructuredType>,
    pub enum_types: Vec<EnumTypeDef>,
    pub entity_sets: Vec<EntitySetDef>,
    pub singletons: Vec<SingletonDef>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structured types keyed by fully qualified name.
    ///
    /// When a name is declared twice the first declaration wins.
    pub fn structured_by_name(&self) -> HashMap<String, &StructuredType> {
        let mut by_name = HashMap::with_capacity(self.structured_types.len());
        for ty in &self.structured_types {
            by_name.entry(ty.full_name()).or_insert(ty);
        }
        by_name
    }

    /// Build the relationship view over structured types.
    pub fn type_graph(&self) -> TypeGraph {
        TypeGraph::build(self)
    }
}

/// Relationship between two structured types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaEdge {
    /// Derived type → base type
    Inherits,
    /// Owner type → navigation target type
    Navigates { property: String, contains_target: bool },
}

/// Inheritance and navigation edges between the structured types of a schema.
///
/// Nodes are fully qualified type names. Edges to types that are not declared
/// in the document are not represented.
#[derive(Debug)]
pub struct TypeGraph {
    graph: DiGraph<String, SchemaEdge>,
    index: HashMap<String, NodeIndex>,
}

impl TypeGraph {
    fn build(schema: &SchemaGraph) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for ty in &schema.structured_types {
            let full_name = ty.full_name();
            let node = graph.add_node(full_name.clone());
            index.insert(full_name, node);
        }

        for ty in &schema.structured_types {
            let from = index[&ty.full_name()];

            if let Some(base) = ty.base_type.as_ref().and_then(|b| index.get(b)) {
                graph.add_edge(from, *base, SchemaEdge::Inherits);
            }

            for nav in &ty.navigation_properties {
                if let Some(target) = index.get(&nav.type_ref.name) {
                    graph.add_edge(
                        from,
                        *target,
                        SchemaEdge::Navigates {
                            property: nav.name.clone(),
                            contains_target: nav.contains_target,
                        },
                    );
                }
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Direct base type of `full_name`, if declared in the document.
    pub fn base_of(&self, full_name: &str) -> Option<&str> {
        let node = *self.index.get(full_name)?;
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|e| matches!(e.weight(), SchemaEdge::Inherits))
            .map(|e| self.graph[e.target()].as_str())
    }

    /// Inheritance chain of `full_name`, root-most base first, excluding the
    /// type itself. Stops at the first base type not declared in the document.
    pub fn ancestors(&self, full_name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = full_name;
        while let Some(base) = self.base_of(current) {
            if base == full_name || chain.iter().any(|c: &String| c == base) {
                break;
            }
            chain.push(base.to_string());
            current = base;
        }
        chain.reverse();
        chain
    }

    /// Whether any type (transitively) inherits from itself.
    pub fn has_inheritance_cycle(&self) -> bool {
        let inheritance = self
            .graph
            .filter_map(|_, n| Some(n.clone()), |_, e| match e {
                SchemaEdge::Inherits => Some(()),
                SchemaEdge::Navigates { .. } => None,
            });
        is_cyclic_directed(&inheritance)
    }
}

/// Join a namespace and a simple name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}
