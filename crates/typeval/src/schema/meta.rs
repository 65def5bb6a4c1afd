//! The meta-schema: a schema that validates schema nodes themselves.
//!
//! Built as a recursive union of one object branch per native kind (each
//! constraining exactly the fields legal for that kind) plus a catch-all
//! branch accepting any node whose kind string is provably disjoint from
//! the native tags. The union is self-referential — child positions point
//! back at the whole union through a `This("Schema")` reference resolved
//! against a private registry — so construction is a lazy fixed point
//! behind a [`OnceLock`], not a literal cyclic structure.

use std::sync::OnceLock;

use crate::error::ValueError;
use crate::registry::Registry;
use crate::schema::kind::KIND_NAMES;
use crate::schema::{build, Schema};

/// Identifier the meta-schema registers itself under.
const SELF_ID: &str = "Schema";

static META: OnceLock<(Schema, Registry)> = OnceLock::new();

fn parts() -> &'static (Schema, Registry) {
    META.get_or_init(build_metaschema)
}

/// The meta-schema node.
///
/// Contract: every schema produced by [`crate::schema::build`] validates
/// against this schema.
#[must_use]
pub fn metaschema() -> &'static Schema {
    &parts().0
}

/// The registry binding `Schema` to the meta-schema, for callers that want
/// to run [`crate::validate`] against it directly.
#[must_use]
pub fn metaschema_registry() -> &'static Registry {
    &parts().1
}

/// Validates a schema node against the meta-schema.
///
/// Callers are expected to screen each schema once, before using it — not
/// once per input.
///
/// # Examples
///
/// ```
/// use typeval::{build, schema::validate_schema};
///
/// let schema = build::array(build::string()).with_min_items(1);
/// assert!(validate_schema(&schema).is_empty());
/// ```
#[must_use]
pub fn validate_schema(schema: &Schema) -> Vec<ValueError> {
    let (meta, registry) = parts();
    crate::validate::validate(meta, registry, &schema.to_value())
}

/// True when the node passes the meta-schema.
#[must_use]
pub fn is_well_formed(schema: &Schema) -> bool {
    validate_schema(schema).is_empty()
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

fn build_metaschema() -> (Schema, Registry) {
    // Self-reference into the union being built.
    let node = || build::self_ref(SELF_ID);
    // A facet that may be absent: the value's schema, or undefined.
    let opt = |schema: Schema| build::union([schema, build::undefined()]);
    // Allow / reject / schema-valued gates for additional properties.
    let gate = || build::union([build::boolean(), node(), build::undefined()]);
    // One union branch: the kind literal plus that kind's legal fields.
    // Nothing is required — `kind` alone discriminates, since a present
    // property still has to match its schema.
    let branch = |kind: &str, fields: Vec<(&str, Schema)>| {
        let mut properties: Vec<(String, Schema)> = vec![("kind".into(), build::literal(kind))];
        properties.extend(fields.into_iter().map(|(key, schema)| (key.into(), schema)));
        build::object(properties)
    };
    let numeric_bounds = |bound: fn() -> Schema| {
        vec![
            ("minimum", opt(bound())),
            ("maximum", opt(bound())),
            ("exclusiveMinimum", opt(bound())),
            ("exclusiveMaximum", opt(bound())),
            ("multipleOf", opt(bound())),
        ]
    };

    let native_branches = vec![
        branch("Any", vec![]),
        branch(
            "Array",
            vec![
                ("items", node()),
                ("minItems", opt(build::number())),
                ("maxItems", opt(build::number())),
                ("uniqueItems", opt(build::boolean())),
                ("contains", opt(node())),
                ("minContains", opt(build::number())),
                ("maxContains", opt(build::number())),
            ],
        ),
        branch("AsyncIterator", vec![("items", node())]),
        branch("BigInt", numeric_bounds(build::bigint)),
        branch("Boolean", vec![]),
        branch(
            "Constructor",
            vec![("parameters", build::array(node())), ("returns", node())],
        ),
        branch(
            "Date",
            vec![
                ("minimumTimestamp", opt(build::number())),
                ("maximumTimestamp", opt(build::number())),
                ("exclusiveMinimumTimestamp", opt(build::number())),
                ("exclusiveMaximumTimestamp", opt(build::number())),
                ("multipleOfTimestamp", opt(build::number())),
            ],
        ),
        branch(
            "Function",
            vec![("parameters", build::array(node())), ("returns", node())],
        ),
        branch("Integer", numeric_bounds(build::number)),
        branch(
            "Intersect",
            vec![
                ("allOf", build::array(node())),
                ("unevaluatedProperties", gate()),
            ],
        ),
        branch("Iterator", vec![("items", node())]),
        branch(
            "Literal",
            vec![(
                "const",
                build::union([build::string(), build::number(), build::boolean()]),
            )],
        ),
        branch(
            "MappedKey",
            vec![(
                "keys",
                build::array(build::union([build::string(), build::number()])),
            )],
        ),
        branch(
            "MappedResult",
            vec![("properties", build::record([("^(.*)$", node())]))],
        ),
        branch("Never", vec![]),
        branch("Not", vec![("not", node())]),
        branch("Null", vec![]),
        branch("Number", numeric_bounds(build::number)),
        branch(
            "Object",
            vec![
                ("properties", build::record([("^(.*)$", node())])),
                ("required", opt(build::array(build::string()))),
                ("additionalProperties", gate()),
                ("minProperties", opt(build::number())),
                ("maxProperties", opt(build::number())),
            ],
        ),
        branch("Promise", vec![("item", node())]),
        branch(
            "Record",
            vec![
                ("patternProperties", build::record([("^(.*)$", node())])),
                ("additionalProperties", gate()),
            ],
        ),
        branch("Ref", vec![("$ref", build::string())]),
        branch(
            "RegExp",
            vec![
                ("source", build::string()),
                ("flags", build::string()),
                ("minLength", opt(build::number())),
                ("maxLength", opt(build::number())),
            ],
        ),
        branch(
            "String",
            vec![
                ("minLength", opt(build::number())),
                ("maxLength", opt(build::number())),
                ("pattern", opt(build::string())),
                ("format", opt(build::string())),
                ("contentEncoding", opt(build::string())),
                ("contentMediaType", opt(build::string())),
            ],
        ),
        branch("Symbol", vec![]),
        branch("TemplateLiteral", vec![("pattern", build::string())]),
        branch("This", vec![("$ref", build::string())]),
        branch(
            "Tuple",
            vec![
                ("items", opt(build::array(node()))),
                ("additionalItems", opt(build::boolean())),
                ("minItems", build::number()),
                ("maxItems", build::number()),
            ],
        ),
        branch("Undefined", vec![]),
        branch("Union", vec![("anyOf", build::array(node()))]),
        branch(
            "Uint8Array",
            vec![
                ("minByteLength", opt(build::number())),
                ("maxByteLength", opt(build::number())),
            ],
        ),
        branch("Unknown", vec![]),
        branch("Void", vec![]),
    ];

    // Any node whose kind string cannot collide with a native tag.
    let native_tags = KIND_NAMES.iter().map(|name| build::literal(*name));
    let unknown_branch = build::object([(
        "kind",
        build::intersect([build::string(), build::not(build::union(native_tags))]),
    )]);

    let mut branches = native_branches;
    branches.push(unknown_branch);
    let meta = build::union(branches).with_id(SELF_ID);

    let mut registry = Registry::new();
    registry.insert(SELF_ID, meta.clone());
    (meta, registry)
}

// ============================================================================
// TESTS
// ============================================================================
