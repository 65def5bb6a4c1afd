//! Union error aggregation: every branch evaluated in declaration order,
//! one composite error whose nested list has exactly one entry per branch.

use pretty_assertions::assert_eq;
use serde_json::json;
use typeval::{build, validate, ErrorKind, Registry, Value};

#[test]
fn string_branch_matches() {
    let schema = build::union([build::string(), build::number()]);
    let errors = validate(&schema, &Registry::new(), &Value::from("1"));
    assert_eq!(errors.len(), 0);
}

#[test]
fn number_branch_matches() {
    let schema = build::union([build::string(), build::number()]);
    let errors = validate(&schema, &Registry::new(), &Value::from(1.0));
    assert_eq!(errors.len(), 0);
}

#[test]
fn no_branch_matches_yields_one_union_error_with_a_branch_per_entry() {
    let schema = build::union([build::string(), build::number()]);
    let errors = validate(&schema, &Registry::new(), &Value::Bool(true));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Union);
    assert_eq!(errors[0].errors.len(), 2);
    assert_eq!(errors[0].errors[0].kind, ErrorKind::String);
    assert_eq!(errors[0].errors[1].kind, ErrorKind::Number);
}

#[test]
fn nested_entries_follow_declaration_order() {
    let schema = build::union([
        build::null(),
        build::boolean(),
        build::string(),
        build::array(build::any()),
    ]);
    let errors = validate(&schema, &Registry::new(), &Value::from(1.0));

    assert_eq!(errors.len(), 1);
    let kinds: Vec<ErrorKind> = errors[0].errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            ErrorKind::Null,
            ErrorKind::Boolean,
            ErrorKind::String,
            ErrorKind::Array,
        ]
    );
}

#[test]
fn branch_with_several_failures_contributes_only_its_first() {
    // The object branch fails twice (two bad properties); the union entry
    // for it must still be a single representative error.
    let schema = build::union([
        build::object([("a", build::string()), ("b", build::number())])
            .with_required(["a", "b"]),
        build::string(),
    ]);
    let value = Value::from(json!({ "a": 1, "b": "x" }));
    let errors = validate(&schema, &Registry::new(), &value);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].errors.len(), 2);
    assert_eq!(errors[0].errors[0].path, "/a");
}

#[test]
fn later_branch_match_suppresses_earlier_failures() {
    let schema = build::union([build::string(), build::number(), build::boolean()]);
    let errors = validate(&schema, &Registry::new(), &Value::Bool(false));
    assert_eq!(errors.len(), 0);
}

#[test]
fn union_error_is_reported_at_the_unions_own_path() {
    let schema = build::object([("id", build::union([build::string(), build::number()]))]);
    let errors = validate(
        &schema,
        &Registry::new(),
        &Value::from(json!({ "id": true })),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Union);
    assert_eq!(errors[0].path, "/id");
    assert_eq!(errors[0].errors.len(), 2);
}

#[test]
fn empty_union_fails_with_zero_nested_entries() {
    let schema = build::union([]);
    let errors = validate(&schema, &Registry::new(), &Value::Null);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Union);
    assert_eq!(errors[0].errors.len(), 0);
}

#[test]
fn optional_field_idiom_accepts_absence_via_undefined_branch() {
    // The optional wrapper is an explicit Union with Undefined, so feeding
    // the marker value through it passes the second branch.
    let schema = build::optional(build::string());
    let registry = Registry::new();
    assert!(validate(&schema, &registry, &Value::from("x")).is_empty());
    assert!(validate(&schema, &registry, &Value::Undefined).is_empty());

    let errors = validate(&schema, &registry, &Value::from(1.0));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].errors.len(), 2);
}
