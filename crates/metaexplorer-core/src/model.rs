//! Display model
//!
//! Flat, ordered items produced by the projector and rendered by the
//! interchange serializer. Every type reference stored here has already been
//! shortened; `full_name` is kept for diagnostics only and is never emitted.

use serde::{Deserialize, Serialize};

// ============================================================================
// Item Kinds
// ============================================================================

/// Discriminator emitted as `ItemType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    EntityType,
    ComplexType,
    EnumType,
    Singleton,
    EntitySet,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::EntityType => "EntityType",
            ItemKind::ComplexType => "ComplexType",
            ItemKind::EnumType => "EnumType",
            ItemKind::Singleton => "Singleton",
            ItemKind::EntitySet => "EntitySet",
        }
    }

    /// Entity sets and singletons are top-level objects rather than types.
    pub fn is_top_level(&self) -> bool {
        matches!(self, ItemKind::EntitySet | ItemKind::Singleton)
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Relationship flags carried by navigation properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub contains_target: bool,
    pub is_collection: bool,
}

/// A property row: structural when `navigation` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// Shortened type name (`C(Inner)` for collections)
    pub type_name: String,
    pub navigation: Option<Navigation>,
}

impl Property {
    pub fn structural(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            navigation: None,
        }
    }

    pub fn navigation(
        name: impl Into<String>,
        type_name: impl Into<String>,
        contains_target: bool,
        is_collection: bool,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            navigation: Some(Navigation {
                contains_target,
                is_collection,
            }),
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.navigation.is_some()
    }
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeItem {
    pub name: String,
    pub full_name: String,
    pub is_abstract: bool,
    pub base_type: Option<String>,
    /// Structural properties first, then navigation properties
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexTypeItem {
    pub name: String,
    pub full_name: String,
    pub base_type: Option<String>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeItem {
    pub name: String,
    pub full_name: String,
    pub members: Vec<String>,
}

/// An entity set or singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelItem {
    pub name: String,
    /// Full type name of the referenced entity (or collection of it)
    pub full_name: String,
    /// Shortened type name
    pub type_name: String,
}

/// One entry of the projected sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayItem {
    EntityType(EntityTypeItem),
    ComplexType(ComplexTypeItem),
    EnumType(EnumTypeItem),
    EntitySet(TopLevelItem),
    Singleton(TopLevelItem),
}

impl DisplayItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            DisplayItem::EntityType(_) => ItemKind::EntityType,
            DisplayItem::ComplexType(_) => ItemKind::ComplexType,
            DisplayItem::EnumType(_) => ItemKind::EnumType,
            DisplayItem::EntitySet(_) => ItemKind::EntitySet,
            DisplayItem::Singleton(_) => ItemKind::Singleton,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DisplayItem::EntityType(e) => &e.name,
            DisplayItem::ComplexType(c) => &c.name,
            DisplayItem::EnumType(e) => &e.name,
            DisplayItem::EntitySet(s) | DisplayItem::Singleton(s) => &s.name,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            DisplayItem::EntityType(e) => &e.full_name,
            DisplayItem::ComplexType(c) => &c.full_name,
            DisplayItem::EnumType(e) => &e.full_name,
            DisplayItem::EntitySet(s) | DisplayItem::Singleton(s) => &s.full_name,
        }
    }

    /// Visual category tag emitted as `Css`.
    pub fn css_class(&self) -> &'static str {
        match self {
            DisplayItem::EntityType(e) if e.is_abstract => "bg-info",
            DisplayItem::EntityType(_) => "bg-primary",
            DisplayItem::ComplexType(_) => "bg-success",
            DisplayItem::EnumType(_) => "bg-dark",
            DisplayItem::EntitySet(_) | DisplayItem::Singleton(_) => "bg-danger",
        }
    }

    pub fn base_type(&self) -> Option<&str> {
        match self {
            DisplayItem::EntityType(e) => e.base_type.as_deref(),
            DisplayItem::ComplexType(c) => c.base_type.as_deref(),
            _ => None,
        }
    }

    pub fn properties(&self) -> Option<&[Property]> {
        match self {
            DisplayItem::EntityType(e) => Some(&e.properties),
            DisplayItem::ComplexType(c) => Some(&c.properties),
            _ => None,
        }
    }

    pub fn members(&self) -> Option<&[String]> {
        match self {
            DisplayItem::EnumType(e) => Some(&e.members),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(is_abstract: bool) -> DisplayItem {
        DisplayItem::EntityType(EntityTypeItem {
            name: "user".to_string(),
            full_name: "microsoft.graph.user".to_string(),
            is_abstract,
            base_type: Some("entity".to_string()),
            properties: vec![Property::structural("id", "Edm.String")],
        })
    }

    #[test]
    fn test_css_class_depends_on_abstractness() {
        assert_eq!(entity(false).css_class(), "bg-primary");
        assert_eq!(entity(true).css_class(), "bg-info");

        let set = DisplayItem::EntitySet(TopLevelItem {
            name: "users".to_string(),
            full_name: "Collection(microsoft.graph.user)".to_string(),
            type_name: "C(user)".to_string(),
        });
        assert_eq!(set.css_class(), "bg-danger");
        assert_eq!(set.kind(), ItemKind::EntitySet);
        assert!(set.kind().is_top_level());
        assert!(set.properties().is_none());
    }

    #[test]
    fn test_accessors() {
        let item = entity(false);
        assert_eq!(item.name(), "user");
        assert_eq!(item.full_name(), "microsoft.graph.user");
        assert_eq!(item.base_type(), Some("entity"));
        assert_eq!(item.properties().map(|p| p.len()), Some(1));
        assert!(item.members().is_none());
        assert_eq!(item.kind().to_string(), "EntityType");
    }

    #[test]
    fn test_property_constructors() {
        let nav = Property::navigation("photos", "C(photo)", true, true);
        assert!(nav.is_navigation());
        assert!(!Property::structural("id", "Edm.String").is_navigation());
    }
}
