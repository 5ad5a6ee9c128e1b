//! Interchange format
//!
//! The producer emits a single assignment of an array literal:
//!
//! ```text
//! const json = [{"ItemType" : "EntitySet","Name" : "users","Css" : "bg-danger","Type" : "C(user)"},...];
//! ```
//!
//! Every object starts with `ItemType`, `Name` and `Css`. The remaining fields
//! depend on the item kind. Separators are only ever placed *between*
//! elements, never before a closing bracket.
//!
//! [`parse_interchange`] reads the artifact back for the client side.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::InterchangeError;
use crate::model::{DisplayItem, ItemKind, Property};

/// Name of the binding the array literal is assigned to.
pub const BINDING_NAME: &str = "json";

const BINDING_PREFIX: &str = "const json =";

// ============================================================================
// Serialization
// ============================================================================

/// Render the display sequence as interchange text.
pub fn serialize(items: &[DisplayItem]) -> String {
    let mut out = String::with_capacity(items.len() * 256);
    out.push_str("const json = [");
    push_joined(&mut out, items, write_item);
    out.push_str("];\n");
    out
}

fn write_item(out: &mut String, item: &DisplayItem) {
    let mut fields = Fields::open(out);
    fields.string("ItemType", item.kind().as_str());
    fields.string("Name", item.name());
    fields.string("Css", item.css_class());

    match item {
        DisplayItem::EntityType(e) => {
            if let Some(base) = &e.base_type {
                fields.string("BaseType", base);
            }
            fields.int("IsAbstract", u8::from(e.is_abstract));
            fields.properties(&e.properties);
        }
        DisplayItem::ComplexType(c) => {
            if let Some(base) = &c.base_type {
                fields.string("BaseType", base);
            }
            fields.properties(&c.properties);
        }
        DisplayItem::EnumType(e) => fields.members(&e.members),
        DisplayItem::EntitySet(s) | DisplayItem::Singleton(s) => {
            fields.string("Type", &s.type_name);
        }
    }
    fields.close();
}

/// Writes `"Key" : value` pairs of one object literal.
struct Fields<'a> {
    out: &'a mut String,
    first: bool,
}

impl<'a> Fields<'a> {
    fn open(out: &'a mut String) -> Self {
        out.push('{');
        Self { out, first: true }
    }

    fn key(&mut self, key: &str) {
        if !self.first {
            self.out.push(',');
        }
        self.first = false;
        let _ = write!(self.out, "\"{}\" : ", key);
    }

    fn string(&mut self, key: &str, value: &str) {
        self.key(key);
        push_quoted(self.out, value);
    }

    fn int(&mut self, key: &str, value: u8) {
        self.key(key);
        let _ = write!(self.out, " {}", value);
    }

    fn properties(&mut self, properties: &[Property]) {
        self.key("Properties");
        self.out.push('[');
        push_joined(self.out, properties, write_property);
        self.out.push(']');
    }

    fn members(&mut self, members: &[String]) {
        self.key("Members");
        self.out.push('[');
        push_joined(self.out, members, |out, m| push_quoted(out, m));
        self.out.push(']');
    }

    fn close(self) {
        self.out.push('}');
    }
}

fn write_property(out: &mut String, property: &Property) {
    let mut fields = Fields::open(out);
    fields.string("Name", &property.name);
    fields.string("Type", &property.type_name);
    if let Some(nav) = &property.navigation {
        fields.string("ContainsTarget", bool_str(nav.contains_target));
        fields.string("IsCollection", bool_str(nav.is_collection));
    }
    fields.close();
}

/// Write `items` separated by `,` with no trailing separator.
fn push_joined<T>(out: &mut String, items: &[T], mut write: impl FnMut(&mut String, &T)) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write(out, item);
    }
}

fn push_quoted(out: &mut String, value: &str) {
    match serde_json::to_string(value) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            let _ = write!(out, "\"{}\"", value);
        }
    }
}

/// String form of a flag: `True` / `False`.
fn bool_str(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// A property row as read back from interchange text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InterchangeProperty {
    pub name: String,
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collection: Option<String>,
}

impl InterchangeProperty {
    pub fn is_navigation(&self) -> bool {
        self.contains_target.is_some()
    }
}

/// One item as read back from interchange text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InterchangeItem {
    pub item_type: ItemKind,
    pub name: String,
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<InterchangeProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl From<&Property> for InterchangeProperty {
    fn from(p: &Property) -> Self {
        Self {
            name: p.name.clone(),
            type_name: p.type_name.clone(),
            contains_target: p
                .navigation
                .map(|n| bool_str(n.contains_target).to_string()),
            is_collection: p.navigation.map(|n| bool_str(n.is_collection).to_string()),
        }
    }
}

impl From<&DisplayItem> for InterchangeItem {
    /// The view of `item` a client sees after parsing the serialized text.
    fn from(item: &DisplayItem) -> Self {
        let (type_name, is_abstract) = match item {
            DisplayItem::EntitySet(s) | DisplayItem::Singleton(s) => {
                (Some(s.type_name.clone()), None)
            }
            DisplayItem::EntityType(e) => (None, Some(u8::from(e.is_abstract))),
            _ => (None, None),
        };
        Self {
            item_type: item.kind(),
            name: item.name().to_string(),
            css: item.css_class().to_string(),
            base_type: item.base_type().map(String::from),
            is_abstract,
            properties: item
                .properties()
                .map(|props| props.iter().map(InterchangeProperty::from).collect()),
            members: item.members().map(<[String]>::to_vec),
            type_name,
        }
    }
}

/// Parse interchange text back into items.
pub fn parse_interchange(text: &str) -> Result<Vec<InterchangeItem>, InterchangeError> {
    let body = text
        .trim()
        .strip_prefix(BINDING_PREFIX)
        .ok_or(InterchangeError::MissingBinding {
            expected: BINDING_PREFIX,
        })?;
    let body = body
        .trim_end()
        .strip_suffix(';')
        .ok_or(InterchangeError::MissingTerminator)?;
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityTypeItem, EnumTypeItem, TopLevelItem};
    use pretty_assertions::assert_eq;

    fn foo() -> DisplayItem {
        DisplayItem::EntityType(EntityTypeItem {
            name: "Foo".to_string(),
            full_name: "ns.Foo".to_string(),
            is_abstract: false,
            base_type: Some("Base".to_string()),
            properties: vec![Property::navigation("Bar", "C(Baz)", true, true)],
        })
    }

    #[test]
    fn test_entity_with_navigation_property() {
        assert_eq!(
            serialize(&[foo()]),
            "const json = [{\"ItemType\" : \"EntityType\",\"Name\" : \"Foo\",\"Css\" : \"bg-primary\",\
             \"BaseType\" : \"Base\",\"IsAbstract\" :  0,\"Properties\" : [{\"Name\" : \"Bar\",\
             \"Type\" : \"C(Baz)\",\"ContainsTarget\" : \"True\",\"IsCollection\" : \"True\"}]}];\n"
        );
    }

    #[test]
    fn test_enum_members_without_trailing_separator() {
        let item = DisplayItem::EnumType(EnumTypeItem {
            name: "letters".to_string(),
            full_name: "ns.letters".to_string(),
            members: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        });
        let text = serialize(&[item]);
        assert!(text.contains("\"Members\" : [\"A\",\"B\",\"C\"]}"));
        assert!(!text.contains(",]"));
        assert!(!text.contains(",}"));
    }

    #[test]
    fn test_top_level_item_fields() {
        let item = DisplayItem::Singleton(TopLevelItem {
            name: "me".to_string(),
            full_name: "ns.user".to_string(),
            type_name: "user".to_string(),
        });
        assert_eq!(
            serialize(&[item]),
            "const json = [{\"ItemType\" : \"Singleton\",\"Name\" : \"me\",\"Css\" : \"bg-danger\",\"Type\" : \"user\"}];\n"
        );
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(serialize(&[]), "const json = [];\n");

        let item = DisplayItem::EntityType(EntityTypeItem {
            name: "empty".to_string(),
            full_name: "ns.empty".to_string(),
            is_abstract: true,
            base_type: None,
            properties: Vec::new(),
        });
        let text = serialize(&[item]);
        assert!(text.ends_with("\"IsAbstract\" :  1,\"Properties\" : []}];\n"));
    }

    #[test]
    fn test_values_are_escaped() {
        let item = DisplayItem::EnumType(EnumTypeItem {
            name: "odd\"name".to_string(),
            full_name: "ns.odd".to_string(),
            members: vec!["back\\slash".to_string()],
        });
        let parsed = parse_interchange(&serialize(&[item])).unwrap();
        assert_eq!(parsed[0].name, "odd\"name");
        assert_eq!(parsed[0].members.as_deref(), Some(&["back\\slash".to_string()][..]));
    }

    #[test]
    fn test_round_trip() {
        let items = vec![
            foo(),
            DisplayItem::EntitySet(TopLevelItem {
                name: "foos".to_string(),
                full_name: "Collection(ns.Foo)".to_string(),
                type_name: "C(Foo)".to_string(),
            }),
        ];
        let parsed = parse_interchange(&serialize(&items)).unwrap();
        let expected: Vec<InterchangeItem> = items.iter().map(InterchangeItem::from).collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_rejects_missing_binding() {
        assert!(matches!(
            parse_interchange("[];"),
            Err(InterchangeError::MissingBinding { .. })
        ));
        assert!(matches!(
            parse_interchange("const json = []"),
            Err(InterchangeError::MissingTerminator)
        ));
        assert!(matches!(
            parse_interchange("const json = [{];"),
            Err(InterchangeError::Json(_))
        ));
    }
}
