//! Reference resolution: transparency against inline definitions,
//! recursive schemas, unresolved targets and non-consuming cycles.

use pretty_assertions::assert_eq;
use serde_json::json;
use typeval::{build, validate, ErrorKind, Registry, Schema, Value};

fn outcomes(schema: &Schema, registry: &Registry, value: &Value) -> Vec<(ErrorKind, String)> {
    validate(schema, registry, value)
        .into_iter()
        .map(|error| (error.kind, error.path))
        .collect()
}

#[test]
fn a_ref_behaves_identically_to_its_inline_definition() {
    let definition = build::object([
        ("name", build::string().with_min_length(1)),
        ("score", build::number().with_minimum(0.0)),
    ])
    .with_required(["name"]);

    let mut registry = Registry::new();
    registry
        .register(definition.clone().with_id("Player"))
        .unwrap();

    let inline = build::array(definition);
    let referenced = build::array(build::ref_to("Player"));

    let values = [
        Value::from(json!([{ "name": "ada", "score": 3 }])),
        Value::from(json!([{ "score": -1 }])),
        Value::from(json!([{ "name": "", "score": 0 }, 7])),
        Value::from(json!("not an array")),
    ];
    for value in &values {
        assert_eq!(
            outcomes(&inline, &registry, value),
            outcomes(&referenced, &registry, value),
        );
    }
}

#[test]
fn recursive_schema_accepts_and_rejects_deep_values() {
    let node = build::recursive("Node", |node| {
        build::object([
            ("id", build::string()),
            ("nodes", build::array(node)),
        ])
        .with_required(["id", "nodes"])
    });

    let mut registry = Registry::new();
    registry.register(node.clone()).unwrap();

    let valid = Value::from(json!({
        "id": "root",
        "nodes": [
            { "id": "a", "nodes": [] },
            { "id": "b", "nodes": [{ "id": "b0", "nodes": [] }] },
        ],
    }));
    assert!(validate(&node, &registry, &valid).is_empty());

    let invalid = Value::from(json!({
        "id": "root",
        "nodes": [{ "id": "a", "nodes": [{ "id": 9, "nodes": [] }] }],
    }));
    let errors = validate(&node, &registry, &invalid);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "/nodes/0/nodes/0/id");
    assert_eq!(errors[0].kind, ErrorKind::String);
}

#[test]
fn unresolved_reference_is_a_distinct_error_kind() {
    let errors = validate(&build::ref_to("Nowhere"), &Registry::new(), &Value::Null);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Ref);
    assert!(errors[0].message.contains("Nowhere"));
}

#[test]
fn unresolved_reference_inside_a_structure_carries_its_path() {
    let schema = build::object([("child", build::ref_to("Nowhere"))]);
    let errors = validate(
        &schema,
        &Registry::new(),
        &Value::from(json!({ "child": 1 })),
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Ref);
    assert_eq!(errors[0].path, "/child");
}

#[test]
fn mutually_referencing_schemas_resolve() {
    let mut registry = Registry::new();
    registry.insert(
        "Branch",
        build::object([("leaves", build::array(build::ref_to("Leaf")))]),
    );
    registry.insert("Leaf", build::object([("width", build::number())]));

    let value = Value::from(json!({ "leaves": [{ "width": 2 }] }));
    assert!(validate(&build::ref_to("Branch"), &registry, &value).is_empty());
}

#[test]
fn non_consuming_reference_cycle_reports_circular() {
    let mut registry = Registry::new();
    registry.insert("A", build::self_ref("B"));
    registry.insert("B", build::self_ref("A"));

    let errors = validate(&build::ref_to("A"), &registry, &Value::from(1.0));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Circular);
}

#[test]
fn consuming_cycles_are_bounded_by_the_value() {
    // The cycle goes through an object property, so each pass consumes a
    // level of the value and terminates without tripping the guard.
    let mut registry = Registry::new();
    registry.insert("Chain", build::object([("next", build::ref_to("Chain"))]));

    let value = Value::from(json!({ "next": { "next": { "next": 1 } } }));
    let errors = validate(&build::ref_to("Chain"), &registry, &value);
    // The innermost `next` is a number, not an object.
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Object);
    assert_eq!(errors[0].path, "/next/next/next");
}
