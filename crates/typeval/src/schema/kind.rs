//! The closed set of schema kinds and their per-kind payloads.
//!
//! [`Kind`] is the discriminant every dispatch in the crate matches
//! exhaustively — adding a kind is a compile-time-visible change in the
//! validator, the converter, the serializer and the meta-schema. Payload
//! structs carry exactly the children and constraint facets legal for that
//! kind; annotations shared by all kinds live in
//! [`Options`](crate::schema::Options).

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::schema::pattern::LazyPattern;
use crate::schema::Schema;

/// Kind tag strings in canonical order, as they appear in serialized nodes.
pub const KIND_NAMES: &[&str] = &[
    "Any",
    "Array",
    "AsyncIterator",
    "BigInt",
    "Boolean",
    "Constructor",
    "Date",
    "Function",
    "Integer",
    "Intersect",
    "Iterator",
    "Literal",
    "MappedKey",
    "MappedResult",
    "Never",
    "Not",
    "Null",
    "Number",
    "Object",
    "Promise",
    "Record",
    "Ref",
    "RegExp",
    "String",
    "Symbol",
    "TemplateLiteral",
    "This",
    "Tuple",
    "Undefined",
    "Union",
    "Uint8Array",
    "Unknown",
    "Void",
];

// ============================================================================
// KIND
// ============================================================================

/// The structural type of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// Accepts every value.
    Any,
    /// A homogeneous sequence.
    Array(ArrayKind),
    /// An async iterator yielding `items`. Host-only: no runtime value
    /// in this crate's data model satisfies it.
    AsyncIterator(StreamKind),
    /// An arbitrary-precision integer with optional bounds.
    BigInt(BigIntKind),
    /// A boolean.
    Boolean,
    /// A constructor signature. Host-only.
    Constructor(SignatureKind),
    /// A calendar timestamp with optional epoch-millisecond bounds.
    Date(DateKind),
    /// A function signature. Host-only.
    Function(SignatureKind),
    /// A number with a zero fractional part.
    Integer(NumberKind),
    /// All of `all_of` must match.
    Intersect(IntersectKind),
    /// An iterator yielding `items`. Host-only.
    Iterator(StreamKind),
    /// Exactly one constant value.
    Literal(LiteralValue),
    /// A key drawn from a mapped-type computation. Type-level only.
    MappedKey(MappedKeyKind),
    /// The result shape of a mapped-type computation. Type-level only.
    MappedResult(MappedResultKind),
    /// Accepts no value.
    Never,
    /// Matches iff the inner schema does not.
    Not(Box<Schema>),
    /// The null value.
    Null,
    /// A finite double-precision number.
    Number(NumberKind),
    /// A keyed structure with declared properties.
    Object(ObjectKind),
    /// A promise resolving to `item`. Host-only.
    Promise(Box<Schema>),
    /// A keyed structure whose keys are constrained by patterns.
    Record(RecordKind),
    /// A reference to a registered schema identifier.
    Ref(String),
    /// A string constrained by a compiled regular expression.
    RegExp(RegExpKind),
    /// A UTF-8 string with optional facets.
    String(StringKind),
    /// A symbol.
    Symbol,
    /// A string matching a template-literal pattern.
    TemplateLiteral(LazyPattern),
    /// A self-reference to an enclosing registered schema.
    This(String),
    /// A fixed-length positional sequence.
    Tuple(TupleKind),
    /// The absent value.
    Undefined,
    /// At least one of `any_of` must match.
    Union(UnionKind),
    /// A byte buffer with optional length bounds.
    Uint8Array(BytesKind),
    /// Accepts every value.
    Unknown,
    /// The unit value: `Undefined` or `Null`.
    Void,
    /// A kind string outside the closed set. Only judged by a registered
    /// custom-kind hook; rejects everything otherwise.
    Custom(CustomKind),
}

impl Kind {
    /// The kind tag string, as serialized.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Kind::Any => "Any",
            Kind::Array(_) => "Array",
            Kind::AsyncIterator(_) => "AsyncIterator",
            Kind::BigInt(_) => "BigInt",
            Kind::Boolean => "Boolean",
            Kind::Constructor(_) => "Constructor",
            Kind::Date(_) => "Date",
            Kind::Function(_) => "Function",
            Kind::Integer(_) => "Integer",
            Kind::Intersect(_) => "Intersect",
            Kind::Iterator(_) => "Iterator",
            Kind::Literal(_) => "Literal",
            Kind::MappedKey(_) => "MappedKey",
            Kind::MappedResult(_) => "MappedResult",
            Kind::Never => "Never",
            Kind::Not(_) => "Not",
            Kind::Null => "Null",
            Kind::Number(_) => "Number",
            Kind::Object(_) => "Object",
            Kind::Promise(_) => "Promise",
            Kind::Record(_) => "Record",
            Kind::Ref(_) => "Ref",
            Kind::RegExp(_) => "RegExp",
            Kind::String(_) => "String",
            Kind::Symbol => "Symbol",
            Kind::TemplateLiteral(_) => "TemplateLiteral",
            Kind::This(_) => "This",
            Kind::Tuple(_) => "Tuple",
            Kind::Undefined => "Undefined",
            Kind::Union(_) => "Union",
            Kind::Uint8Array(_) => "Uint8Array",
            Kind::Unknown => "Unknown",
            Kind::Void => "Void",
            Kind::Custom(custom) => &custom.kind,
        }
    }

    /// True when `name` is one of the native kind tags.
    #[must_use]
    pub fn is_native_name(name: &str) -> bool {
        KIND_NAMES.contains(&name)
    }
}

// ============================================================================
// PAYLOADS
// ============================================================================

/// Constraints for [`Kind::Array`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayKind {
    /// Schema every element must satisfy.
    pub items: Box<Schema>,
    /// Inclusive lower bound on length.
    pub min_items: Option<usize>,
    /// Inclusive upper bound on length.
    pub max_items: Option<usize>,
    /// Reject structurally equal elements when `true`.
    pub unique_items: Option<bool>,
    /// Count elements matching this schema for the `contains` bounds.
    pub contains: Option<Box<Schema>>,
    /// Lower bound on the `contains` count (defaults to 1 when `contains`
    /// is set).
    pub min_contains: Option<usize>,
    /// Upper bound on the `contains` count.
    pub max_contains: Option<usize>,
}

/// Payload for the iterator-shaped kinds (`Iterator`, `AsyncIterator`).
#[derive(Debug, Clone, PartialEq)]
pub struct StreamKind {
    /// Schema of the yielded items.
    pub items: Box<Schema>,
}

/// Bounds for [`Kind::BigInt`], checked with exact integer arithmetic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BigIntKind {
    pub minimum: Option<BigInt>,
    pub maximum: Option<BigInt>,
    pub exclusive_minimum: Option<BigInt>,
    pub exclusive_maximum: Option<BigInt>,
    pub multiple_of: Option<BigInt>,
}

/// Signature payload for the callable kinds (`Function`, `Constructor`).
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureKind {
    pub parameters: Vec<Schema>,
    pub returns: Box<Schema>,
}

/// Epoch-millisecond bounds for [`Kind::Date`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateKind {
    pub minimum_timestamp: Option<i64>,
    pub maximum_timestamp: Option<i64>,
    pub exclusive_minimum_timestamp: Option<i64>,
    pub exclusive_maximum_timestamp: Option<i64>,
    pub multiple_of_timestamp: Option<i64>,
}

/// Branches for [`Kind::Intersect`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectKind {
    /// Every branch must pass independently.
    pub all_of: Vec<Schema>,
    /// Governs object keys claimed by no branch: `false` rejects them,
    /// a schema validates them, absent allows them.
    pub unevaluated_properties: Option<AdditionalProperties>,
}

/// The constant of a [`Kind::Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_owned())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<i64> for LiteralValue {
    fn from(n: i64) -> Self {
        LiteralValue::Number(n as f64)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        LiteralValue::Number(f64::from(n))
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

/// Keys of a [`Kind::MappedKey`] (strings or numbers).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedKeyKind {
    pub keys: Vec<LiteralValue>,
}

/// Property shapes of a [`Kind::MappedResult`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedResultKind {
    pub properties: IndexMap<String, Schema>,
}

/// Bounds for the float-backed numeric kinds (`Number`, `Integer`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberKind {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

/// Declared shape of a [`Kind::Object`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectKind {
    /// Property name → schema, in declaration order.
    pub properties: IndexMap<String, Schema>,
    /// Property names that must be present.
    pub required: Option<Vec<String>>,
    /// Governs keys outside `properties`.
    pub additional_properties: Option<AdditionalProperties>,
    /// Inclusive lower bound on the number of keys.
    pub min_properties: Option<usize>,
    /// Inclusive upper bound on the number of keys.
    pub max_properties: Option<usize>,
}

/// Key-pattern shape of a [`Kind::Record`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordKind {
    /// Pattern → schema, tried in declaration order; the first matching
    /// pattern claims the key.
    pub pattern_properties: Vec<(LazyPattern, Schema)>,
    /// Governs keys claimed by no pattern.
    pub additional_properties: Option<AdditionalProperties>,
}

/// Constraints for [`Kind::RegExp`]: a compiled source plus string length
/// bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RegExpKind {
    pub pattern: LazyPattern,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// Facets for [`Kind::String`]. All present facets are checked
/// independently; no facet short-circuits the others.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringKind {
    /// Inclusive lower bound on length, in characters.
    pub min_length: Option<usize>,
    /// Inclusive upper bound on length, in characters.
    pub max_length: Option<usize>,
    /// Regular expression the string must match.
    pub pattern: Option<LazyPattern>,
    /// Named format, resolved through the registry's format predicates.
    pub format: Option<String>,
    /// Content encoding; `base64` is checked natively.
    pub content_encoding: Option<String>,
    /// Media-type annotation (not checked).
    pub content_media_type: Option<String>,
}

/// Positional shape of a [`Kind::Tuple`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TupleKind {
    /// One schema per position.
    pub items: Vec<Schema>,
    /// `false` rejects positions beyond `items`; absent or `true` allows
    /// them.
    pub additional_items: Option<bool>,
    /// Inclusive lower bound on length.
    pub min_items: usize,
    /// Inclusive upper bound on length.
    pub max_items: usize,
}

/// Branches for [`Kind::Union`], evaluated in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionKind {
    pub any_of: Vec<Schema>,
}

/// Byte-length bounds for [`Kind::Uint8Array`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BytesKind {
    pub min_byte_length: Option<usize>,
    pub max_byte_length: Option<usize>,
}

/// A kind string outside the closed set, with its raw payload preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomKind {
    /// The non-native kind tag.
    pub kind: String,
    /// Raw payload fields, carried verbatim.
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// What an object-shaped schema says about keys it does not declare:
/// allow them, reject them, or validate them against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

impl From<bool> for AdditionalProperties {
    fn from(allowed: bool) -> Self {
        AdditionalProperties::Allowed(allowed)
    }
}

impl From<Schema> for AdditionalProperties {
    fn from(schema: Schema) -> Self {
        AdditionalProperties::Schema(Box::new(schema))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_the_closed_set() {
        assert!(Kind::is_native_name("String"));
        assert!(Kind::is_native_name("Uint8Array"));
        assert!(!Kind::is_native_name("Vector"));
        assert_eq!(KIND_NAMES.len(), 33);
    }

    #[test]
    fn custom_kind_reports_its_own_name() {
        let kind = Kind::Custom(CustomKind {
            kind: "Vector".into(),
            data: serde_json::Map::new(),
        });
        assert_eq!(kind.name(), "Vector");
    }

    #[test]
    fn literal_conversions() {
        assert_eq!(LiteralValue::from("a"), LiteralValue::String("a".into()));
        assert_eq!(LiteralValue::from(2), LiteralValue::Number(2.0));
        assert_eq!(LiteralValue::from(true), LiteralValue::Bool(true));
    }
}
