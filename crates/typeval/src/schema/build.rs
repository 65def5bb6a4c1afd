//! Constructors for every native schema kind.
//!
//! One free function per kind, in the same factory-function style the rest
//! of the crate's combinators use. Constructors return a bare [`Schema`];
//! constraint facets and annotations are chained afterwards:
//!
//! ```
//! use typeval::build;
//!
//! let user = build::object([
//!     ("name", build::string().with_min_length(1)),
//!     ("age", build::integer().with_minimum(0.0)),
//!     ("tags", build::array(build::string()).with_unique_items(true)),
//! ])
//! .with_required(["name"]);
//! ```

use serde_json::{Map, Value as JsonValue};

use crate::schema::kind::{
    ArrayKind, BigIntKind, BytesKind, CustomKind, DateKind, IntersectKind, Kind, LiteralValue,
    MappedKeyKind, MappedResultKind, NumberKind, ObjectKind, RecordKind, RegExpKind, SignatureKind,
    StreamKind, StringKind, TupleKind, UnionKind,
};
use crate::schema::pattern::LazyPattern;
use crate::schema::Schema;

/// Accepts every value.
#[must_use]
pub fn any() -> Schema {
    Schema::from_kind(Kind::Any)
}

/// Accepts every value (the cautious spelling of [`any`]).
#[must_use]
pub fn unknown() -> Schema {
    Schema::from_kind(Kind::Unknown)
}

/// Accepts no value.
#[must_use]
pub fn never() -> Schema {
    Schema::from_kind(Kind::Never)
}

/// The null value.
#[must_use]
pub fn null() -> Schema {
    Schema::from_kind(Kind::Null)
}

/// The absent value.
#[must_use]
pub fn undefined() -> Schema {
    Schema::from_kind(Kind::Undefined)
}

/// The unit value: absent or null.
#[must_use]
pub fn void() -> Schema {
    Schema::from_kind(Kind::Void)
}

/// A boolean.
#[must_use]
pub fn boolean() -> Schema {
    Schema::from_kind(Kind::Boolean)
}

/// A symbol.
#[must_use]
pub fn symbol() -> Schema {
    Schema::from_kind(Kind::Symbol)
}

/// A UTF-8 string.
#[must_use]
pub fn string() -> Schema {
    Schema::from_kind(Kind::String(StringKind::default()))
}

/// A finite double-precision number.
#[must_use]
pub fn number() -> Schema {
    Schema::from_kind(Kind::Number(NumberKind::default()))
}

/// A number with a zero fractional part.
#[must_use]
pub fn integer() -> Schema {
    Schema::from_kind(Kind::Integer(NumberKind::default()))
}

/// An arbitrary-precision integer.
#[must_use]
pub fn bigint() -> Schema {
    Schema::from_kind(Kind::BigInt(BigIntKind::default()))
}

/// A calendar timestamp.
#[must_use]
pub fn date() -> Schema {
    Schema::from_kind(Kind::Date(DateKind::default()))
}

/// A byte buffer.
#[must_use]
pub fn uint8array() -> Schema {
    Schema::from_kind(Kind::Uint8Array(BytesKind::default()))
}

/// A string constrained by a regular expression with ECMAScript-style
/// flags.
#[must_use]
pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Schema {
    Schema::from_kind(Kind::RegExp(RegExpKind {
        pattern: LazyPattern::with_flags(source, flags),
        min_length: None,
        max_length: None,
    }))
}

/// A string matching a template-literal pattern (expected to be
/// `^…$`-anchored by its producer).
#[must_use]
pub fn template_literal(pattern: impl Into<String>) -> Schema {
    Schema::from_kind(Kind::TemplateLiteral(LazyPattern::new(pattern)))
}

/// Exactly one constant string, number or boolean.
#[must_use]
pub fn literal(value: impl Into<LiteralValue>) -> Schema {
    Schema::from_kind(Kind::Literal(value.into()))
}

/// A homogeneous sequence of `items`.
#[must_use]
pub fn array(items: Schema) -> Schema {
    Schema::from_kind(Kind::Array(ArrayKind {
        items: Box::new(items),
        min_items: None,
        max_items: None,
        unique_items: None,
        contains: None,
        min_contains: None,
        max_contains: None,
    }))
}

/// A fixed-length positional sequence. Length bounds default to the number
/// of declared positions.
#[must_use]
pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Schema {
    let items: Vec<Schema> = items.into_iter().collect();
    let len = items.len();
    Schema::from_kind(Kind::Tuple(TupleKind {
        items,
        additional_items: None,
        min_items: len,
        max_items: len,
    }))
}

/// A keyed structure with declared properties. Nothing is required by
/// default; chain [`Schema::with_required`] to demand presence.
#[must_use]
pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Schema)>) -> Schema {
    Schema::from_kind(Kind::Object(ObjectKind {
        properties: properties
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect(),
        ..ObjectKind::default()
    }))
}

/// A keyed structure whose keys are claimed by regex patterns, tried in
/// declaration order.
#[must_use]
pub fn record<P: Into<String>>(patterns: impl IntoIterator<Item = (P, Schema)>) -> Schema {
    Schema::from_kind(Kind::Record(RecordKind {
        pattern_properties: patterns
            .into_iter()
            .map(|(pattern, schema)| (LazyPattern::new(pattern), schema))
            .collect(),
        additional_properties: None,
    }))
}

/// At least one branch must match; branches are evaluated in declaration
/// order.
#[must_use]
pub fn union(branches: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::from_kind(Kind::Union(UnionKind {
        any_of: branches.into_iter().collect(),
    }))
}

/// Every branch must match.
#[must_use]
pub fn intersect(branches: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::from_kind(Kind::Intersect(IntersectKind {
        all_of: branches.into_iter().collect(),
        unevaluated_properties: None,
    }))
}

/// Matches iff `inner` does not.
#[must_use]
pub fn not(inner: Schema) -> Schema {
    Schema::from_kind(Kind::Not(Box::new(inner)))
}

/// A reference to a schema registered under `target`.
#[must_use]
pub fn ref_to(target: impl Into<String>) -> Schema {
    Schema::from_kind(Kind::Ref(target.into()))
}

/// A self-reference to the enclosing schema registered under `target`.
#[must_use]
pub fn self_ref(target: impl Into<String>) -> Schema {
    Schema::from_kind(Kind::This(target.into()))
}

/// Fixed-point constructor for self-referential schemas: `body` receives a
/// self-reference node and the result carries `id` so it can be registered.
///
/// ```
/// use typeval::{build, Registry, Value};
/// use serde_json::json;
///
/// let node = build::recursive("Node", |node| {
///     build::object([
///         ("value", build::number()),
///         ("children", build::array(node)),
///     ])
///     .with_required(["value", "children"])
/// });
///
/// let mut registry = Registry::new();
/// registry.register(node.clone()).unwrap();
///
/// let tree = Value::from(json!({
///     "value": 1,
///     "children": [{ "value": 2, "children": [] }],
/// }));
/// assert!(node.is_valid(&registry, &tree));
/// ```
#[must_use]
pub fn recursive(id: impl Into<String>, body: impl FnOnce(Schema) -> Schema) -> Schema {
    let id = id.into();
    body(self_ref(id.clone())).with_id(id)
}

/// An optional value: `schema` or absent.
#[must_use]
pub fn optional(schema: Schema) -> Schema {
    union([schema, undefined()])
}

/// A nilable value: `schema` or null.
#[must_use]
pub fn nilable(schema: Schema) -> Schema {
    union([schema, null()])
}

/// A promise resolving to `item`. Host-only; rejects every runtime value.
#[must_use]
pub fn promise(item: Schema) -> Schema {
    Schema::from_kind(Kind::Promise(Box::new(item)))
}

/// An iterator yielding `items`. Host-only; rejects every runtime value.
#[must_use]
pub fn iterator(items: Schema) -> Schema {
    Schema::from_kind(Kind::Iterator(StreamKind {
        items: Box::new(items),
    }))
}

/// An async iterator yielding `items`. Host-only; rejects every runtime
/// value.
#[must_use]
pub fn async_iterator(items: Schema) -> Schema {
    Schema::from_kind(Kind::AsyncIterator(StreamKind {
        items: Box::new(items),
    }))
}

/// A function signature. Host-only; rejects every runtime value.
#[must_use]
pub fn function(parameters: impl IntoIterator<Item = Schema>, returns: Schema) -> Schema {
    Schema::from_kind(Kind::Function(SignatureKind {
        parameters: parameters.into_iter().collect(),
        returns: Box::new(returns),
    }))
}

/// A constructor signature. Host-only; rejects every runtime value.
#[must_use]
pub fn constructor(parameters: impl IntoIterator<Item = Schema>, returns: Schema) -> Schema {
    Schema::from_kind(Kind::Constructor(SignatureKind {
        parameters: parameters.into_iter().collect(),
        returns: Box::new(returns),
    }))
}

/// A mapped-key set. Type-level only; rejects every runtime value.
#[must_use]
pub fn mapped_key<L: Into<LiteralValue>>(keys: impl IntoIterator<Item = L>) -> Schema {
    Schema::from_kind(Kind::MappedKey(MappedKeyKind {
        keys: keys.into_iter().map(Into::into).collect(),
    }))
}

/// A mapped-result shape. Type-level only; rejects every runtime value.
#[must_use]
pub fn mapped_result<K: Into<String>>(
    properties: impl IntoIterator<Item = (K, Schema)>,
) -> Schema {
    Schema::from_kind(Kind::MappedResult(MappedResultKind {
        properties: properties
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect(),
    }))
}

/// A schema of a kind outside the closed set. Judged only by a custom-kind
/// hook registered for `kind`; rejects everything otherwise.
#[must_use]
pub fn custom(kind: impl Into<String>, data: Map<String, JsonValue>) -> Schema {
    Schema::from_kind(Kind::Custom(CustomKind {
        kind: kind.into(),
        data,
    }))
}

// ============================================================================
// TESTS
// ============================================================================
