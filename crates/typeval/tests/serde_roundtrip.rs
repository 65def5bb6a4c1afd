//! Serialization round trips: a schema that travels through its wire form
//! keeps both its structure and its validation behaviour.

use pretty_assertions::assert_eq;
use serde_json::json;
use typeval::{build, validate, Registry, Schema, Value};

fn sample_schemas() -> Vec<Schema> {
    vec![
        build::string().with_min_length(2).with_pattern("^[a-z]+$"),
        build::number().with_minimum(0.0).with_multiple_of(0.5),
        build::bigint().with_minimum_bigint(0),
        build::date().with_minimum_timestamp(0),
        build::array(build::union([build::string(), build::number()])).with_unique_items(true),
        build::tuple([build::string(), build::boolean()]),
        build::object([
            ("name", build::string()),
            ("meta", build::record([("^x-", build::any())])),
        ])
        .with_required(["name"])
        .with_additional_properties(false),
        build::intersect([
            build::object([("a", build::string())]),
            build::object([("b", build::number())]),
        ])
        .with_unevaluated_properties(false),
        build::not(build::null()),
        build::recursive("Tree", |tree| {
            build::object([("children", build::array(tree))]).with_required(["children"])
        }),
    ]
}

fn sample_values() -> Vec<Value> {
    vec![
        Value::from(json!("ab")),
        Value::from(json!(1.5)),
        Value::from(json!(["x", 1, "x"])),
        Value::from(json!({ "name": "n", "meta": {} })),
        Value::from(json!({ "a": "s", "b": 2 })),
        Value::from(json!({ "children": [] })),
        Value::from(json!(null)),
        Value::from(json!([true, false])),
    ]
}

#[test]
fn structure_survives_the_wire() {
    for schema in sample_schemas() {
        let json = serde_json::to_value(&schema).unwrap();
        let parsed: Schema = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, schema, "kind {}", schema.kind_name());
    }
}

#[test]
fn behaviour_survives_the_wire() {
    let mut registry = Registry::new();
    registry.insert("Tree", build::recursive("Tree", |tree| {
        build::object([("children", build::array(tree))]).with_required(["children"])
    }));

    for schema in sample_schemas() {
        let parsed: Schema =
            serde_json::from_str(&serde_json::to_string(&schema).unwrap()).unwrap();
        for value in sample_values() {
            let before: Vec<_> = validate(&schema, &registry, &value)
                .into_iter()
                .map(|e| (e.kind, e.path))
                .collect();
            let after: Vec<_> = validate(&parsed, &registry, &value)
                .into_iter()
                .map(|e| (e.kind, e.path))
                .collect();
            assert_eq!(before, after, "kind {}", schema.kind_name());
        }
    }
}

#[test]
fn text_round_trip_is_stable() {
    for schema in sample_schemas() {
        let first = serde_json::to_string(&schema).unwrap();
        let reparsed: Schema = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&reparsed).unwrap();
        assert_eq!(first, second);
    }
}
