//! Path step equality and rendering

use std::collections::BTreeMap;

use attrwire::{AttrType, AttrValue, Path, PathStep, Paths};

#[test]
fn test_element_key_value_equal() {
    let cases: Vec<(&str, PathStep, PathStep, bool)> = vec![
        (
            "attribute-name",
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            PathStep::AttributeName("test".to_string()),
            false,
        ),
        (
            "element-key-int",
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            PathStep::ElementKeyInt(0),
            false,
        ),
        (
            "element-key-string",
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            PathStep::ElementKeyString("test".to_string()),
            false,
        ),
        (
            "different-value-kind",
            PathStep::ElementKeyValue(AttrValue::known_bool(true)),
            PathStep::ElementKeyValue(AttrValue::known_string("not-test")),
            false,
        ),
        (
            "different-value",
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            PathStep::ElementKeyValue(AttrValue::known_string("not-test")),
            false,
        ),
        (
            "equal",
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            true,
        ),
    ];
    for (name, step, other, expected) in cases {
        assert_eq!(step == other, expected, "case {name}");
    }
}

#[test]
fn test_element_key_value_structural_equality() {
    // distinctly constructed but structurally equal values
    let a = PathStep::ElementKeyValue(AttrValue::known_list(
        AttrType::String,
        vec![AttrValue::known_string("x")],
    ));
    let b = PathStep::ElementKeyValue(AttrValue::known_list(
        AttrType::String,
        vec![AttrValue::known_string("x")],
    ));
    assert_eq!(a, b);

    // same elements, different declared element type
    let c = PathStep::ElementKeyValue(AttrValue::known_list(AttrType::String, vec![]));
    let d = PathStep::ElementKeyValue(AttrValue::known_list(AttrType::Number, vec![]));
    assert_ne!(c, d);
}

#[test]
fn test_element_key_value_string() {
    let cases: Vec<(&str, PathStep, &str)> = vec![
        (
            "bool-value",
            PathStep::ElementKeyValue(AttrValue::known_bool(true)),
            "[Value(true)]",
        ),
        (
            "number-value",
            PathStep::ElementKeyValue(AttrValue::known_number(123)),
            "[Value(123)]",
        ),
        (
            "list-value",
            PathStep::ElementKeyValue(AttrValue::known_list(
                AttrType::String,
                vec![
                    AttrValue::known_string("test-element-1"),
                    AttrValue::known_string("test-element-2"),
                ],
            )),
            r#"[Value(["test-element-1","test-element-2"])]"#,
        ),
        (
            "map-value",
            PathStep::ElementKeyValue(AttrValue::known_map(
                AttrType::String,
                BTreeMap::from([
                    (
                        "test-key-1".to_string(),
                        AttrValue::known_string("test-value-1"),
                    ),
                    (
                        "test-key-2".to_string(),
                        AttrValue::known_string("test-value-2"),
                    ),
                ]),
            )),
            r#"[Value({"test-key-1":"test-value-1","test-key-2":"test-value-2"})]"#,
        ),
        (
            "object-value",
            PathStep::ElementKeyValue(AttrValue::known_object(
                BTreeMap::from([
                    ("test_attr_1".to_string(), AttrType::Bool),
                    ("test_attr_2".to_string(), AttrType::String),
                ]),
                BTreeMap::from([
                    ("test_attr_1".to_string(), AttrValue::known_bool(true)),
                    (
                        "test_attr_2".to_string(),
                        AttrValue::known_string("test-value"),
                    ),
                ]),
            )),
            r#"[Value({"test_attr_1":true,"test_attr_2":"test-value"})]"#,
        ),
        (
            "string-null",
            PathStep::ElementKeyValue(AttrType::String.null_value()),
            "[Value(<null>)]",
        ),
        (
            "string-unknown",
            PathStep::ElementKeyValue(AttrType::String.unknown_value()),
            "[Value(<unknown>)]",
        ),
        (
            "string-value",
            PathStep::ElementKeyValue(AttrValue::known_string("test")),
            r#"[Value("test")]"#,
        ),
    ];
    for (name, step, expected) in cases {
        assert_eq!(step.to_string(), expected, "case {name}");
    }
}

#[test]
fn test_path_building_and_rendering() {
    let path = Path::root("list").with_element_key_int(0);
    assert_eq!(path.to_string(), "list[0]");
    assert_eq!(path.steps().len(), 2);

    let set_path = Path::root("set")
        .with_element_key_value(AttrValue::known_string("member"));
    assert_eq!(set_path.to_string(), r#"set[Value("member")]"#);
}

#[test]
fn test_paths_membership_uses_structural_equality() {
    let paths: Paths = vec![
        Path::root("set").with_element_key_value(AttrValue::known_string("member")),
    ]
    .into();
    // rebuilt path, structurally identical
    assert!(paths.contains(
        &Path::root("set").with_element_key_value(AttrValue::known_string("member"))
    ));
    assert!(!paths.contains(
        &Path::root("set").with_element_key_value(AttrValue::known_string("other"))
    ));
}
