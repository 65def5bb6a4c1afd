//! End-to-end validation flows: mixed payloads, idempotence, errors as
//! data, and convert-then-validate.

use pretty_assertions::assert_eq;
use serde_json::json;
use typeval::prelude::*;

fn api_payload_schema() -> Schema {
    build::object([
        ("id", build::union([build::string(), build::integer()])),
        ("name", build::string().with_min_length(1).with_max_length(64)),
        (
            "tags",
            build::array(build::string())
                .with_unique_items(true)
                .with_max_items(8),
        ),
        (
            "settings",
            build::record([("^opt_", build::boolean())]).with_additional_properties(false),
        ),
        ("parent", build::optional(build::string())),
    ])
    .with_required(["id", "name"])
}

#[test]
fn a_conforming_payload_produces_no_errors() {
    let value = Value::from(json!({
        "id": 7,
        "name": "widget",
        "tags": ["a", "b"],
        "settings": { "opt_dark": true },
    }));
    let errors = validate(&api_payload_schema(), &Registry::new(), &value);
    assert_eq!(errors, vec![]);
}

#[test]
fn each_violation_is_reported_at_its_own_path() {
    let value = Value::from(json!({
        "id": 7,
        "name": "",
        "tags": ["a", "a"],
        "settings": { "opt_dark": true, "rogue": 1 },
    }));
    let errors = validate(&api_payload_schema(), &Registry::new(), &value);

    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["/name", "/tags", "/settings/rogue"]);
}

#[test]
fn validation_is_idempotent_and_mutates_nothing() {
    let schema = api_payload_schema();
    let registry = Registry::new();
    let value = Value::from(json!({ "id": true, "name": "", "tags": [1] }));

    let schema_before = schema.clone();
    let value_before = value.clone();

    let first = validate(&schema, &registry, &value);
    let second = validate(&schema, &registry, &value);
    let third = validate(&schema, &registry, &value);

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(schema, schema_before);
    assert_eq!(value, value_before);
}

#[test]
fn errors_are_data_with_a_serializable_shape() {
    let schema = build::object([("age", build::integer().with_minimum(0.0))]);
    let errors = validate(
        &schema,
        &Registry::new(),
        &Value::from(json!({ "age": -3 })),
    );
    assert_eq!(errors.len(), 1);

    let serialized = serde_json::to_value(&errors[0]).unwrap();
    assert_eq!(serialized["type"], json!("Integer"));
    assert_eq!(serialized["path"], json!("/age"));
    assert_eq!(serialized["schema"]["kind"], json!("Integer"));
    assert_eq!(serialized["value"], json!(-3.0));

    // Display stays human-readable.
    assert_eq!(errors[0].to_string(), "[/age] Must be >= 0");
}

#[test]
fn convert_then_validate_accepts_stringly_typed_input() {
    let schema = build::object([
        ("port", build::integer().with_minimum(1.0).with_maximum(65535.0)),
        ("verbose", build::boolean()),
    ])
    .with_required(["port"]);
    let registry = Registry::new();

    let raw = Value::from(json!({ "port": "8080", "verbose": "true" }));
    assert!(!is_valid(&schema, &registry, &raw));

    let converted = convert(&schema, &registry, &raw);
    assert!(is_valid(&schema, &registry, &converted));
}

#[test]
fn conversion_never_decides_acceptance() {
    let schema = build::integer().with_maximum(10.0);
    let registry = Registry::new();

    let converted = convert(&schema, &registry, &Value::from("99"));
    assert_eq!(converted, Value::Number(99.0));
    let errors = validate(&schema, &registry, &converted);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Integer);
}

#[test]
fn shared_schema_and_registry_serve_many_values() {
    let schema = api_payload_schema();
    let registry = Registry::new();
    let validator = Validator::new(&registry);

    for i in 0..100 {
        let value = Value::from(json!({ "id": i, "name": format!("n{i}") }));
        assert!(validator.is_valid(&schema, &value), "iteration {i}");
    }
}

#[test]
fn nested_unions_report_through_composite_entries() {
    let schema = build::union([
        build::object([("kind", build::literal("circle")), ("radius", build::number())])
            .with_required(["kind", "radius"]),
        build::object([("kind", build::literal("square")), ("side", build::number())])
            .with_required(["kind", "side"]),
    ]);

    let value = Value::from(json!({ "kind": "circle", "radius": "big" }));
    let errors = validate(&schema, &Registry::new(), &value);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Union);
    assert_eq!(errors[0].errors.len(), 2);
    // The circle branch got furthest: its first failure is the radius.
    assert_eq!(errors[0].errors[0].path, "/radius");
    // The square branch fails its required check first.
    assert_eq!(errors[0].errors[1].path, "/side");
}
