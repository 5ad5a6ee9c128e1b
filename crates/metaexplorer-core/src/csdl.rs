//! CSDL schema document reader
//!
//! Reads an OData CSDL (XML) metadata document into a [`SchemaGraph`].
//! Only the constructs the explorer displays are retained:
//!
//! - `EntityType` / `ComplexType` with `Property` and `NavigationProperty`
//! - `EnumType` with `Member`
//! - `EntityContainer` with `EntitySet` and `Singleton`
//!
//! Annotations, operations, terms and type definitions are skipped. Element
//! names are matched on their local name, so both the `edm` default namespace
//! and the `edmx:` wrapper are accepted.
//!
//! Qualified names that use a schema alias (e.g. `graph.user`) are rewritten
//! to the schema namespace (`microsoft.graph.user`) once the whole document
//! has been read.

use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::error::CsdlError;
use crate::schema::{
    EntitySetDef, EnumTypeDef, NavigationPropertyDef, PropertyDef, SchemaGraph, SingletonDef,
    StructuredType, TypeKind, TypeRef,
};

/// Read a CSDL document into a schema graph.
pub fn read_csdl(xml: &str) -> Result<SchemaGraph, CsdlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ReaderState::default();
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| CsdlError::xml(reader.error_position() as u64, e))?;

        match event {
            Event::Start(e) => {
                state.open(&e, depth)?;
                depth += 1;
            }
            Event::Empty(e) => {
                state.open(&e, depth)?;
                state.close(local_name(&e).as_str(), depth);
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                state.close(&name, depth);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let graph = state.finish();
    check_inheritance(&graph)?;

    debug!(
        structured = graph.structured_types.len(),
        enums = graph.enum_types.len(),
        entity_sets = graph.entity_sets.len(),
        singletons = graph.singletons.len(),
        "Read schema document"
    );

    Ok(graph)
}

// ============================================================================
// Reader State
// ============================================================================

/// The `<Schema>` currently open.
#[derive(Debug)]
struct SchemaScope {
    namespace: String,
    depth: usize,
}

/// A declaration whose children are being collected.
#[derive(Debug)]
enum OpenDeclaration {
    Structured(StructuredType),
    Enum(EnumTypeDef),
}

#[derive(Debug, Default)]
struct ReaderState {
    graph: SchemaGraph,
    /// Alias → namespace
    aliases: HashMap<String, String>,
    schema: Option<SchemaScope>,
    open: Option<(OpenDeclaration, usize)>,
    container_depth: Option<usize>,
}

impl ReaderState {
    fn open(&mut self, e: &BytesStart<'_>, depth: usize) -> Result<(), CsdlError> {
        let element = local_name(e);
        match element.as_str() {
            "Schema" => {
                let namespace = required(e, &element, "Namespace")?;
                if let Some(alias) = attribute(e, "Alias")? {
                    self.aliases.insert(alias, namespace.clone());
                }
                trace!(%namespace, "Entering schema");
                self.schema = Some(SchemaScope { namespace, depth });
            }
            // Aliases for referenced documents
            "Include" => {
                if let (Some(namespace), Some(alias)) =
                    (attribute(e, "Namespace")?, attribute(e, "Alias")?)
                {
                    self.aliases.insert(alias, namespace);
                }
            }
            "EntityType" | "ComplexType" => {
                let namespace = self.namespace(&element)?;
                let kind = if element == "EntityType" {
                    TypeKind::Entity
                } else {
                    TypeKind::Complex
                };
                let mut ty = StructuredType::new(kind, namespace, required(e, &element, "Name")?);
                ty.base_type = attribute(e, "BaseType")?;
                ty.is_abstract = flag(e, "Abstract")?;
                self.open = Some((OpenDeclaration::Structured(ty), depth));
            }
            "EnumType" => {
                let namespace = self.namespace(&element)?;
                let ty = EnumTypeDef {
                    namespace,
                    name: required(e, &element, "Name")?,
                    members: Vec::new(),
                };
                self.open = Some((OpenDeclaration::Enum(ty), depth));
            }
            "Property" | "NavigationProperty" | "Member" => {
                let Some((declaration, open_depth)) = self.open.as_mut() else {
                    return Ok(());
                };
                if depth != *open_depth + 1 {
                    return Ok(());
                }
                match (declaration, element.as_str()) {
                    (OpenDeclaration::Structured(ty), "Property") => {
                        ty.properties.push(PropertyDef {
                            name: required(e, &element, "Name")?,
                            type_ref: TypeRef::parse(&required(e, &element, "Type")?),
                        });
                    }
                    (OpenDeclaration::Structured(ty), "NavigationProperty") => {
                        ty.navigation_properties.push(NavigationPropertyDef {
                            name: required(e, &element, "Name")?,
                            type_ref: TypeRef::parse(&required(e, &element, "Type")?),
                            contains_target: flag(e, "ContainsTarget")?,
                        });
                    }
                    (OpenDeclaration::Enum(ty), "Member") => {
                        ty.members.push(required(e, &element, "Name")?);
                    }
                    _ => {}
                }
            }
            "EntityContainer" => {
                self.namespace(&element)?;
                self.container_depth = Some(depth);
            }
            "EntitySet" if self.in_container(depth) => {
                self.graph.entity_sets.push(EntitySetDef {
                    name: required(e, &element, "Name")?,
                    entity_type: required(e, &element, "EntityType")?,
                });
            }
            "Singleton" if self.in_container(depth) => {
                self.graph.singletons.push(SingletonDef {
                    name: required(e, &element, "Name")?,
                    entity_type: required(e, &element, "Type")?,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, element: &str, depth: usize) {
        match element {
            "Schema" if self.schema.as_ref().is_some_and(|s| s.depth == depth) => {
                self.schema = None;
            }
            "EntityContainer" if self.container_depth == Some(depth) => {
                self.container_depth = None;
            }
            "EntityType" | "ComplexType" | "EnumType" => {
                if !self.open.as_ref().is_some_and(|(_, d)| *d == depth) {
                    return;
                }
                match self.open.take() {
                    Some((OpenDeclaration::Structured(ty), _)) => {
                        self.graph.structured_types.push(ty)
                    }
                    Some((OpenDeclaration::Enum(ty), _)) => self.graph.enum_types.push(ty),
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn namespace(&self, element: &str) -> Result<String, CsdlError> {
        self.schema
            .as_ref()
            .map(|s| s.namespace.clone())
            .ok_or_else(|| CsdlError::OutsideSchema {
                element: element.to_string(),
            })
    }

    fn in_container(&self, depth: usize) -> bool {
        self.container_depth == Some(depth.wrapping_sub(1))
    }

    /// Resolve aliases in every type reference and return the graph.
    fn finish(self) -> SchemaGraph {
        let aliases = self.aliases;
        let mut graph = self.graph;

        for ty in &mut graph.structured_types {
            if let Some(base) = ty.base_type.as_mut() {
                *base = resolve_alias(base, &aliases);
            }
            for prop in &mut ty.properties {
                prop.type_ref.name = resolve_alias(&prop.type_ref.name, &aliases);
            }
            for nav in &mut ty.navigation_properties {
                nav.type_ref.name = resolve_alias(&nav.type_ref.name, &aliases);
            }
        }
        for set in &mut graph.entity_sets {
            set.entity_type = resolve_alias(&set.entity_type, &aliases);
        }
        for singleton in &mut graph.singletons {
            singleton.entity_type = resolve_alias(&singleton.entity_type, &aliases);
        }

        graph
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Read an attribute by local name, unescaping its value.
fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, CsdlError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| CsdlError::xml(0, err))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|err| CsdlError::xml(0, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required(e: &BytesStart<'_>, element: &str, name: &'static str) -> Result<String, CsdlError> {
    match attribute(e, name)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CsdlError::missing_attribute(element, name)),
    }
}

fn flag(e: &BytesStart<'_>, name: &str) -> Result<bool, CsdlError> {
    Ok(attribute(e, name)?.is_some_and(|v| v.eq_ignore_ascii_case("true")))
}

/// Rewrite `Alias.Name` to `Namespace.Name`.
fn resolve_alias(name: &str, aliases: &HashMap<String, String>) -> String {
    match name.rsplit_once('.') {
        Some((qualifier, simple)) => match aliases.get(qualifier) {
            Some(namespace) => format!("{}.{}", namespace, simple),
            None => name.to_string(),
        },
        None => name.to_string(),
    }
}

fn check_inheritance(graph: &SchemaGraph) -> Result<(), CsdlError> {
    let types = graph.type_graph();
    if !types.has_inheritance_cycle() {
        return Ok(());
    }

    for ty in &graph.structured_types {
        let start = ty.full_name();
        let mut seen = HashSet::new();
        let mut current = start.clone();
        while let Some(base) = types.base_of(&current) {
            if base == start {
                return Err(CsdlError::InheritanceCycle { type_name: start });
            }
            if !seen.insert(base.to_string()) {
                break;
            }
            current = base.to_string();
        }
    }

    Err(CsdlError::InheritanceCycle {
        type_name: String::new(),
    })
}
