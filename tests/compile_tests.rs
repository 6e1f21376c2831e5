//! Schema compilation: ordering, projection, and definition errors

use std::collections::HashMap;

use attrwire::{
    AttrError, AttrType, Attribute, Context, DescriptionKind, NestedAttributes, NestingMode,
    Schema, WireNesting, WireType,
};

fn schema_of(attributes: Vec<(&str, Attribute)>) -> Schema {
    Schema {
        version: 1,
        attributes: attributes
            .into_iter()
            .map(|(name, attribute)| (name.to_string(), attribute))
            .collect(),
        ..Schema::default()
    }
}

#[test]
fn test_attributes_sorted_by_name() {
    let ctx = Context::background();
    let schema = schema_of(vec![
        ("b", Attribute::of_type(AttrType::String)),
        ("a", Attribute::of_type(AttrType::Number)),
        ("c", Attribute::of_type(AttrType::Bool)),
    ]);
    let compiled = schema.compile(&ctx).unwrap();
    let names: Vec<_> = compiled
        .block
        .attributes
        .iter()
        .map(|attribute| attribute.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(compiled.version, 1);
}

#[test]
fn test_terminal_attribute_projects_wire_type() {
    let ctx = Context::background();
    let schema = schema_of(vec![(
        "tags",
        Attribute::of_type(AttrType::List(Box::new(AttrType::String))),
    )]);
    let compiled = schema.compile(&ctx).unwrap();
    assert_eq!(
        compiled.block.attributes[0].ty,
        Some(WireType::List(Box::new(WireType::String)))
    );
    assert!(compiled.block.attributes[0].nested.is_none());
}

#[test]
fn test_zero_attributes_fails() {
    let ctx = Context::background();
    let schema = Schema::default();
    match schema.compile(&ctx) {
        Err(AttrError::Definition { reason, .. }) => {
            assert!(reason.contains("at least one attribute"));
        }
        other => panic!("expected definition error, got {other:?}"),
    }
}

#[test]
fn test_both_type_and_nested_fails() {
    let ctx = Context::background();
    let mut attribute = Attribute::of_type(AttrType::String);
    attribute.nested = Some(NestedAttributes::new(
        HashMap::from([("inner".to_string(), Attribute::of_type(AttrType::Bool))]),
        NestingMode::Single,
    ));
    let schema = schema_of(vec![("broken", attribute)]);
    match schema.compile(&ctx) {
        Err(AttrError::Definition { path, reason }) => {
            assert_eq!(path.to_string(), "broken");
            assert!(reason.contains("both"));
        }
        other => panic!("expected definition error, got {other:?}"),
    }
}

#[test]
fn test_neither_type_nor_nested_fails() {
    let ctx = Context::background();
    let schema = schema_of(vec![("empty", Attribute::default())]);
    match schema.compile(&ctx) {
        Err(AttrError::Definition { path, reason }) => {
            assert_eq!(path.to_string(), "empty");
            assert!(reason.contains("either"));
        }
        other => panic!("expected definition error, got {other:?}"),
    }
}

#[test]
fn test_nested_modes_and_bounds() {
    let ctx = Context::background();
    let modes = [
        (NestingMode::Single, WireNesting::Single),
        (NestingMode::List, WireNesting::List),
        (NestingMode::Set, WireNesting::Set),
        (NestingMode::Map, WireNesting::Map),
    ];
    for (mode, expected) in modes {
        let schema = schema_of(vec![(
            "block",
            Attribute::nested(
                NestedAttributes::new(
                    HashMap::from([("inner".to_string(), Attribute::of_type(AttrType::Bool))]),
                    mode,
                )
                .with_bounds(1, 5),
            ),
        )]);
        let compiled = schema.compile(&ctx).unwrap();
        let nested = compiled.block.attributes[0]
            .nested
            .as_ref()
            .expect("nested object missing");
        assert_eq!(nested.nesting, expected);
        assert_eq!(nested.min_items, 1);
        assert_eq!(nested.max_items, 5);
    }
}

#[test]
fn test_nested_children_sorted_and_recursive() {
    let ctx = Context::background();
    let grandchild = NestedAttributes::new(
        HashMap::from([("leaf".to_string(), Attribute::of_type(AttrType::Number))]),
        NestingMode::Single,
    );
    let child_attributes = HashMap::from([
        ("z_last".to_string(), Attribute::of_type(AttrType::String)),
        ("a_first".to_string(), Attribute::of_type(AttrType::Bool)),
        ("m_nested".to_string(), Attribute::nested(grandchild)),
    ]);
    let schema = schema_of(vec![(
        "block",
        Attribute::nested(NestedAttributes::new(child_attributes, NestingMode::List)),
    )]);
    let compiled = schema.compile(&ctx).unwrap();
    let nested = compiled.block.attributes[0].nested.as_ref().unwrap();
    let names: Vec<_> = nested
        .attributes
        .iter()
        .map(|attribute| attribute.name.as_str())
        .collect();
    assert_eq!(names, vec!["a_first", "m_nested", "z_last"]);

    let inner = nested.attributes[1].nested.as_ref().unwrap();
    assert_eq!(inner.attributes[0].name, "leaf");
    assert_eq!(inner.nesting, WireNesting::Single);
}

#[test]
fn test_nested_child_error_carries_child_path() {
    let ctx = Context::background();
    let schema = schema_of(vec![(
        "block",
        Attribute::nested(NestedAttributes::new(
            HashMap::from([("bad".to_string(), Attribute::default())]),
            NestingMode::Single,
        )),
    )]);
    match schema.compile(&ctx) {
        Err(AttrError::Definition { path, .. }) => {
            assert_eq!(path.to_string(), "block.bad");
        }
        other => panic!("expected definition error, got {other:?}"),
    }
}

#[test]
fn test_markdown_description_wins() {
    let ctx = Context::background();
    let mut attribute = Attribute::of_type(AttrType::String);
    attribute.description = Some("plain".to_string());
    attribute.markdown_description = Some("**rich**".to_string());

    let mut schema = schema_of(vec![("described", attribute)]);
    schema.description = Some("block plain".to_string());
    schema.markdown_description = Some("block **rich**".to_string());
    schema.deprecation_message = Some("gone in v2".to_string());

    let compiled = schema.compile(&ctx).unwrap();
    assert_eq!(compiled.block.description.as_deref(), Some("block **rich**"));
    assert_eq!(compiled.block.description_kind, DescriptionKind::Markdown);
    assert!(compiled.block.deprecated);

    let attribute = &compiled.block.attributes[0];
    assert_eq!(attribute.description.as_deref(), Some("**rich**"));
    assert_eq!(attribute.description_kind, DescriptionKind::Markdown);
    assert!(!attribute.deprecated);
}

#[test]
fn test_plain_description_projection() {
    let ctx = Context::background();
    let mut attribute = Attribute::of_type(AttrType::String);
    attribute.description = Some("plain only".to_string());
    let schema = schema_of(vec![("described", attribute)]);
    let compiled = schema.compile(&ctx).unwrap();
    let attribute = &compiled.block.attributes[0];
    assert_eq!(attribute.description.as_deref(), Some("plain only"));
    assert_eq!(attribute.description_kind, DescriptionKind::Plain);
}

#[test]
fn test_flags_carried_through() {
    let ctx = Context::background();
    let mut attribute = Attribute::of_type(AttrType::String);
    attribute.required = true;
    attribute.sensitive = true;
    let schema = schema_of(vec![("secret", attribute)]);
    let compiled = schema.compile(&ctx).unwrap();
    let attribute = &compiled.block.attributes[0];
    assert!(attribute.required && attribute.sensitive);
    assert!(!attribute.optional && !attribute.computed);
}

#[test]
fn test_cancellation_stops_compilation() {
    let (ctx, handle) = Context::cancellable();
    handle.cancel();
    let schema = schema_of(vec![("a", Attribute::of_type(AttrType::Bool))]);
    assert_eq!(schema.compile(&ctx), Err(AttrError::Cancelled));
}

#[test]
fn test_compiled_schema_serializes() {
    let ctx = Context::background();
    let schema = schema_of(vec![("a", Attribute::of_type(AttrType::Bool))]);
    let compiled = schema.compile(&ctx).unwrap();
    let json = serde_json::to_value(&compiled).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["block"]["attributes"][0]["name"], "a");
    assert_eq!(json["block"]["attributes"][0]["ty"], "bool");
}
