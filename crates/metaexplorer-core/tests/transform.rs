//! End-to-end tests: schema document → display items → interchange text.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package metaexplorer-core --test transform
//! ```

use metaexplorer_core::{
    parse_interchange, read_csdl, serialize, transform, DisplayItem, InterchangeItem, ItemKind,
    ProjectionOptions, Projector,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Test Helpers
// ============================================================================

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("Failed to read fixture")
}

fn project_fixture() -> Vec<DisplayItem> {
    let schema = read_csdl(&fixture("graph_metadata.xml")).expect("Failed to read schema");
    Projector::default()
        .project(&schema)
        .expect("Failed to project schema")
}

fn find<'a>(items: &'a [InterchangeItem], name: &str) -> &'a InterchangeItem {
    items
        .iter()
        .find(|i| i.name == name)
        .unwrap_or_else(|| panic!("item '{}' not found", name))
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_fixture_pass_order() {
    let items = project_fixture();
    let order: Vec<_> = items.iter().map(|i| (i.kind(), i.name())).collect();

    assert_eq!(
        order,
        vec![
            (ItemKind::EntitySet, "users"),
            (ItemKind::Singleton, "me"),
            (ItemKind::EntityType, "entity"),
            (ItemKind::EntityType, "directoryObject"),
            (ItemKind::EntityType, "user"),
            (ItemKind::EntityType, "message"),
            (ItemKind::ComplexType, "itemBody"),
            (ItemKind::EnumType, "bodyType"),
        ]
    );
}

#[test]
fn test_fixture_full_names_are_kept_internally() {
    let items = project_fixture();
    assert_eq!(items[4].full_name(), "microsoft.graph.user");
    assert_eq!(items[0].full_name(), "Collection(microsoft.graph.user)");
}

// ============================================================================
// Interchange Text
// ============================================================================

#[test]
fn test_fixture_text_prefix_is_exact() {
    let text = transform(&fixture("graph_metadata.xml"), &ProjectionOptions::default()).unwrap();

    assert!(text.starts_with(
        "const json = [{\"ItemType\" : \"EntitySet\",\"Name\" : \"users\",\"Css\" : \"bg-danger\",\"Type\" : \"C(user)\"},\
         {\"ItemType\" : \"Singleton\",\"Name\" : \"me\",\"Css\" : \"bg-danger\",\"Type\" : \"user\"},\
         {\"ItemType\" : \"EntityType\",\"Name\" : \"entity\",\"Css\" : \"bg-info\",\"IsAbstract\" :  1,\
         \"Properties\" : [{\"Name\" : \"id\",\"Type\" : \"Edm.String\"}]},"
    ));
    assert!(text.ends_with(
        "{\"ItemType\" : \"EnumType\",\"Name\" : \"bodyType\",\"Css\" : \"bg-dark\",\"Members\" : [\"text\",\"html\"]}];\n"
    ));
    assert!(!text.contains(",]"));
    assert!(!text.contains(",}"));
    assert!(!text.contains("microsoft.graph."));
    assert!(!text.contains("Collection("));
}

#[test]
fn test_fixture_round_trip() {
    let items = project_fixture();
    let parsed = parse_interchange(&serialize(&items)).unwrap();
    let expected: Vec<InterchangeItem> = items.iter().map(InterchangeItem::from).collect();
    assert_eq!(parsed, expected);
}

#[test]
fn test_fixture_user_properties() {
    let text = transform(&fixture("graph_metadata.xml"), &ProjectionOptions::default()).unwrap();
    let items = parse_interchange(&text).unwrap();
    let user = find(&items, "user");

    assert_eq!(user.base_type.as_deref(), Some("directoryObject"));
    assert_eq!(user.is_abstract, Some(0));

    let rows: Vec<_> = user
        .properties
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| {
            (
                p.name.as_str(),
                p.type_name.as_str(),
                p.contains_target.as_deref(),
                p.is_collection.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("id", "Edm.String", None, None),
            ("deletedDateTime", "Edm.DateTimeOffset", None, None),
            ("displayName", "Edm.String", None, None),
            ("businessPhones", "C(Edm.String)", None, None),
            ("manager", "directoryObject", Some("False"), Some("False")),
            ("messages", "C(message)", Some("True"), Some("True")),
        ]
    );
}

#[test]
fn test_complex_type_references_enum() {
    let text = transform(&fixture("graph_metadata.xml"), &ProjectionOptions::default()).unwrap();
    let items = parse_interchange(&text).unwrap();
    let body = find(&items, "itemBody");

    assert_eq!(body.item_type, ItemKind::ComplexType);
    assert_eq!(body.css, "bg-success");
    assert!(body.is_abstract.is_none());
    assert_eq!(body.properties.as_ref().unwrap()[1].type_name, "bodyType");
}

#[test]
fn test_foo_scenario() {
    let xml = r#"<Schema Namespace="ns">
        <EntityType Name="Base" />
        <EntityType Name="Baz" />
        <EntityType Name="Foo" BaseType="ns.Base">
            <NavigationProperty Name="Bar" Type="Collection(ns.Baz)" ContainsTarget="true" />
        </EntityType>
    </Schema>"#;
    let options = ProjectionOptions {
        names: metaexplorer_core::NameShortener::new("ns."),
        ..Default::default()
    };

    let text = transform(xml, &options).unwrap();
    assert!(text.contains(
        "{\"ItemType\" : \"EntityType\",\"Name\" : \"Foo\",\"Css\" : \"bg-primary\",\"BaseType\" : \"Base\",\
         \"IsAbstract\" :  0,\"Properties\" : [{\"Name\" : \"Bar\",\"Type\" : \"C(Baz)\",\
         \"ContainsTarget\" : \"True\",\"IsCollection\" : \"True\"}]}"
    ));
}

#[test]
fn test_invalid_document_produces_no_text() {
    let err = transform("<Schema Namespace=\"ns\"><EntityType>", &ProjectionOptions::default());
    assert!(err.is_err());
}
