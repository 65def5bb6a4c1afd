//! Schema (de)serialization.
//!
//! Nodes serialize to the JSON-Schema-shaped record described by the crate
//! contract: a `kind` discriminator plus kind-specific fields, with
//! annotations inline. [`Schema::to_value`] is the canonical walk — it
//! produces a [`Value`] (so BigInt facets stay exact for meta-schema
//! validation); the JSON projection simply reuses [`Value::to_json`], under
//! which BigInt facets become decimal strings and are parsed back on the
//! way in.

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::FromPrimitive as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::schema::kind::{
    AdditionalProperties, ArrayKind, BigIntKind, BytesKind, CustomKind, DateKind, IntersectKind,
    Kind, LiteralValue, MappedKeyKind, MappedResultKind, NumberKind, ObjectKind, RecordKind,
    RegExpKind, SignatureKind, StreamKind, StringKind, TupleKind, UnionKind,
};
use crate::schema::pattern::LazyPattern;
use crate::schema::{Options, Schema};
use crate::value::Value;

/// Annotation keys shared by every kind.
const ANNOTATION_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "title",
    "description",
    "default",
    "examples",
    "readOnly",
    "writeOnly",
];

// ============================================================================
// ERRORS
// ============================================================================

/// Failures while parsing a serialized schema node.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The serialized node is not a JSON object.
    #[error("schema node must be a JSON object")]
    NotAnObject,

    /// The serialized node has no string `kind` tag.
    #[error("schema node is missing its `kind` tag")]
    MissingKind,

    /// A kind-specific field has the wrong shape.
    #[error("schema field `{field}`: expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

impl SchemaError {
    fn field(field: &str, expected: &'static str) -> Self {
        SchemaError::InvalidField {
            field: field.to_owned(),
            expected,
        }
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

impl Schema {
    /// The node as a [`Value`], the exact shape the meta-schema validates.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map: IndexMap<String, Value> = IndexMap::new();
        map.insert("kind".into(), Value::String(self.kind_name().to_owned()));
        write_kind(&self.kind, &mut map);
        write_options(&self.options, &mut map);
        Value::Object(map)
    }

    /// The node as JSON. BigInt facets project to decimal strings.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        self.to_value().to_json()
    }

    /// Parses a serialized node. Kind strings outside the closed set
    /// produce a `Custom` schema carrying the payload verbatim.
    pub fn from_json(json: &JsonValue) -> Result<Self, SchemaError> {
        let map = json.as_object().ok_or(SchemaError::NotAnObject)?;
        let kind_name = map
            .get("kind")
            .and_then(JsonValue::as_str)
            .ok_or(SchemaError::MissingKind)?;
        let (kind, consumed) = read_kind(kind_name, map)?;

        // A custom kind claims every non-annotation field as payload, so
        // only the shared annotations remain for the options bag.
        let options = if matches!(kind, Kind::Custom(_)) {
            read_options(map, &AllFields)
        } else {
            read_options(map, &Consumed(consumed))
        };
        Ok(Schema { kind, options })
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Schema::from_json(&json).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// WRITING
// ============================================================================

fn write_kind(kind: &Kind, map: &mut IndexMap<String, Value>) {
    match kind {
        Kind::Any
        | Kind::Boolean
        | Kind::Never
        | Kind::Null
        | Kind::Symbol
        | Kind::Undefined
        | Kind::Unknown
        | Kind::Void => {}

        Kind::Array(facets) => {
            map.insert("items".into(), facets.items.to_value());
            put_usize(map, "minItems", facets.min_items);
            put_usize(map, "maxItems", facets.max_items);
            put_bool(map, "uniqueItems", facets.unique_items);
            if let Some(contains) = &facets.contains {
                map.insert("contains".into(), contains.to_value());
            }
            put_usize(map, "minContains", facets.min_contains);
            put_usize(map, "maxContains", facets.max_contains);
        }

        Kind::AsyncIterator(facets) | Kind::Iterator(facets) => {
            map.insert("items".into(), facets.items.to_value());
        }

        Kind::BigInt(facets) => {
            put_bigint(map, "minimum", facets.minimum.as_ref());
            put_bigint(map, "maximum", facets.maximum.as_ref());
            put_bigint(map, "exclusiveMinimum", facets.exclusive_minimum.as_ref());
            put_bigint(map, "exclusiveMaximum", facets.exclusive_maximum.as_ref());
            put_bigint(map, "multipleOf", facets.multiple_of.as_ref());
        }

        Kind::Constructor(facets) | Kind::Function(facets) => {
            map.insert(
                "parameters".into(),
                Value::Array(facets.parameters.iter().map(Schema::to_value).collect()),
            );
            map.insert("returns".into(), facets.returns.to_value());
        }

        Kind::Date(facets) => {
            put_i64(map, "minimumTimestamp", facets.minimum_timestamp);
            put_i64(map, "maximumTimestamp", facets.maximum_timestamp);
            put_i64(
                map,
                "exclusiveMinimumTimestamp",
                facets.exclusive_minimum_timestamp,
            );
            put_i64(
                map,
                "exclusiveMaximumTimestamp",
                facets.exclusive_maximum_timestamp,
            );
            put_i64(map, "multipleOfTimestamp", facets.multiple_of_timestamp);
        }

        Kind::Integer(facets) | Kind::Number(facets) => {
            put_f64(map, "minimum", facets.minimum);
            put_f64(map, "maximum", facets.maximum);
            put_f64(map, "exclusiveMinimum", facets.exclusive_minimum);
            put_f64(map, "exclusiveMaximum", facets.exclusive_maximum);
            put_f64(map, "multipleOf", facets.multiple_of);
        }

        Kind::Intersect(facets) => {
            map.insert(
                "allOf".into(),
                Value::Array(facets.all_of.iter().map(Schema::to_value).collect()),
            );
            put_additional(
                map,
                "unevaluatedProperties",
                facets.unevaluated_properties.as_ref(),
            );
        }

        Kind::Literal(constant) => {
            map.insert("const".into(), literal_to_value(constant));
        }

        Kind::MappedKey(facets) => {
            map.insert(
                "keys".into(),
                Value::Array(facets.keys.iter().map(literal_to_value).collect()),
            );
        }

        Kind::MappedResult(facets) => {
            map.insert("properties".into(), schema_map_to_value(&facets.properties));
        }

        Kind::Not(inner) => {
            map.insert("not".into(), inner.to_value());
        }

        Kind::Object(facets) => {
            map.insert("properties".into(), schema_map_to_value(&facets.properties));
            if let Some(required) = &facets.required {
                map.insert(
                    "required".into(),
                    Value::Array(
                        required
                            .iter()
                            .map(|name| Value::String(name.clone()))
                            .collect(),
                    ),
                );
            }
            put_additional(
                map,
                "additionalProperties",
                facets.additional_properties.as_ref(),
            );
            put_usize(map, "minProperties", facets.min_properties);
            put_usize(map, "maxProperties", facets.max_properties);
        }

        Kind::Promise(item) => {
            map.insert("item".into(), item.to_value());
        }

        Kind::Record(facets) => {
            let patterns: IndexMap<String, Value> = facets
                .pattern_properties
                .iter()
                .map(|(pattern, schema)| (pattern.source().to_owned(), schema.to_value()))
                .collect();
            map.insert("patternProperties".into(), Value::Object(patterns));
            put_additional(
                map,
                "additionalProperties",
                facets.additional_properties.as_ref(),
            );
        }

        Kind::Ref(target) | Kind::This(target) => {
            map.insert("$ref".into(), Value::String(target.clone()));
        }

        Kind::RegExp(facets) => {
            map.insert(
                "source".into(),
                Value::String(facets.pattern.source().to_owned()),
            );
            map.insert(
                "flags".into(),
                Value::String(facets.pattern.flags().to_owned()),
            );
            put_usize(map, "minLength", facets.min_length);
            put_usize(map, "maxLength", facets.max_length);
        }

        Kind::String(facets) => {
            put_usize(map, "minLength", facets.min_length);
            put_usize(map, "maxLength", facets.max_length);
            if let Some(pattern) = &facets.pattern {
                map.insert("pattern".into(), Value::String(pattern.source().to_owned()));
            }
            put_string(map, "format", facets.format.as_deref());
            put_string(map, "contentEncoding", facets.content_encoding.as_deref());
            put_string(map, "contentMediaType", facets.content_media_type.as_deref());
        }

        Kind::TemplateLiteral(pattern) => {
            map.insert("pattern".into(), Value::String(pattern.source().to_owned()));
        }

        Kind::Tuple(facets) => {
            map.insert(
                "items".into(),
                Value::Array(facets.items.iter().map(Schema::to_value).collect()),
            );
            put_bool(map, "additionalItems", facets.additional_items);
            map.insert("minItems".into(), Value::Number(facets.min_items as f64));
            map.insert("maxItems".into(), Value::Number(facets.max_items as f64));
        }

        Kind::Union(facets) => {
            map.insert(
                "anyOf".into(),
                Value::Array(facets.any_of.iter().map(Schema::to_value).collect()),
            );
        }

        Kind::Uint8Array(facets) => {
            put_usize(map, "minByteLength", facets.min_byte_length);
            put_usize(map, "maxByteLength", facets.max_byte_length);
        }

        Kind::Custom(custom) => {
            for (key, value) in &custom.data {
                map.insert(key.clone(), Value::from(value));
            }
        }
    }
}

fn write_options(options: &Options, map: &mut IndexMap<String, Value>) {
    put_string(map, "$schema", options.dialect.as_deref());
    put_string(map, "$id", options.id.as_deref());
    put_string(map, "title", options.title.as_deref());
    put_string(map, "description", options.description.as_deref());
    if let Some(default) = &options.default {
        map.insert("default".into(), Value::from(default));
    }
    if let Some(examples) = &options.examples {
        map.insert("examples".into(), Value::from(examples));
    }
    put_bool(map, "readOnly", options.read_only);
    put_bool(map, "writeOnly", options.write_only);
    for (key, value) in &options.extra {
        map.insert(key.clone(), Value::from(value));
    }
}

fn schema_map_to_value(properties: &IndexMap<String, Schema>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(key, schema)| (key.clone(), schema.to_value()))
            .collect(),
    )
}

fn literal_to_value(constant: &LiteralValue) -> Value {
    match constant {
        LiteralValue::String(s) => Value::String(s.clone()),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Bool(b) => Value::Bool(*b),
    }
}

fn put_usize(map: &mut IndexMap<String, Value>, key: &str, value: Option<usize>) {
    if let Some(n) = value {
        map.insert(key.into(), Value::Number(n as f64));
    }
}

fn put_i64(map: &mut IndexMap<String, Value>, key: &str, value: Option<i64>) {
    if let Some(n) = value {
        map.insert(key.into(), Value::Number(n as f64));
    }
}

fn put_f64(map: &mut IndexMap<String, Value>, key: &str, value: Option<f64>) {
    if let Some(n) = value {
        map.insert(key.into(), Value::Number(n));
    }
}

fn put_bool(map: &mut IndexMap<String, Value>, key: &str, value: Option<bool>) {
    if let Some(b) = value {
        map.insert(key.into(), Value::Bool(b));
    }
}

fn put_string(map: &mut IndexMap<String, Value>, key: &str, value: Option<&str>) {
    if let Some(s) = value {
        map.insert(key.into(), Value::String(s.to_owned()));
    }
}

fn put_bigint(map: &mut IndexMap<String, Value>, key: &str, value: Option<&BigInt>) {
    if let Some(i) = value {
        map.insert(key.into(), Value::BigInt(i.clone()));
    }
}

fn put_additional(map: &mut IndexMap<String, Value>, key: &str, value: Option<&AdditionalProperties>) {
    if let Some(additional) = value {
        let encoded = match additional {
            AdditionalProperties::Allowed(allowed) => Value::Bool(*allowed),
            AdditionalProperties::Schema(schema) => schema.to_value(),
        };
        map.insert(key.into(), encoded);
    }
}

// ============================================================================
// READING
// ============================================================================

type Fields = &'static [&'static str];

fn read_kind(kind_name: &str, map: &Map<String, JsonValue>) -> Result<(Kind, Fields), SchemaError> {
    let kind = match kind_name {
        "Any" => return Ok((Kind::Any, &[])),
        "Boolean" => return Ok((Kind::Boolean, &[])),
        "Never" => return Ok((Kind::Never, &[])),
        "Null" => return Ok((Kind::Null, &[])),
        "Symbol" => return Ok((Kind::Symbol, &[])),
        "Undefined" => return Ok((Kind::Undefined, &[])),
        "Unknown" => return Ok((Kind::Unknown, &[])),
        "Void" => return Ok((Kind::Void, &[])),

        "Array" => {
            const FIELDS: Fields = &[
                "items",
                "minItems",
                "maxItems",
                "uniqueItems",
                "contains",
                "minContains",
                "maxContains",
            ];
            let kind = Kind::Array(ArrayKind {
                items: Box::new(req_schema(map, "items")?),
                min_items: opt_usize(map, "minItems")?,
                max_items: opt_usize(map, "maxItems")?,
                unique_items: opt_bool(map, "uniqueItems")?,
                contains: opt_schema(map, "contains")?.map(Box::new),
                min_contains: opt_usize(map, "minContains")?,
                max_contains: opt_usize(map, "maxContains")?,
            });
            return Ok((kind, FIELDS));
        }

        "AsyncIterator" | "Iterator" => {
            let stream = StreamKind {
                items: Box::new(req_schema(map, "items")?),
            };
            let kind = if kind_name == "AsyncIterator" {
                Kind::AsyncIterator(stream)
            } else {
                Kind::Iterator(stream)
            };
            return Ok((kind, &["items"]));
        }

        "BigInt" => {
            const FIELDS: Fields = &[
                "minimum",
                "maximum",
                "exclusiveMinimum",
                "exclusiveMaximum",
                "multipleOf",
            ];
            let kind = Kind::BigInt(BigIntKind {
                minimum: opt_bigint(map, "minimum")?,
                maximum: opt_bigint(map, "maximum")?,
                exclusive_minimum: opt_bigint(map, "exclusiveMinimum")?,
                exclusive_maximum: opt_bigint(map, "exclusiveMaximum")?,
                multiple_of: opt_bigint(map, "multipleOf")?,
            });
            return Ok((kind, FIELDS));
        }

        "Constructor" | "Function" => {
            let signature = SignatureKind {
                parameters: opt_schema_vec(map, "parameters")?.unwrap_or_default(),
                returns: Box::new(req_schema(map, "returns")?),
            };
            let kind = if kind_name == "Constructor" {
                Kind::Constructor(signature)
            } else {
                Kind::Function(signature)
            };
            return Ok((kind, &["parameters", "returns"]));
        }

        "Date" => {
            const FIELDS: Fields = &[
                "minimumTimestamp",
                "maximumTimestamp",
                "exclusiveMinimumTimestamp",
                "exclusiveMaximumTimestamp",
                "multipleOfTimestamp",
            ];
            let kind = Kind::Date(DateKind {
                minimum_timestamp: opt_i64(map, "minimumTimestamp")?,
                maximum_timestamp: opt_i64(map, "maximumTimestamp")?,
                exclusive_minimum_timestamp: opt_i64(map, "exclusiveMinimumTimestamp")?,
                exclusive_maximum_timestamp: opt_i64(map, "exclusiveMaximumTimestamp")?,
                multiple_of_timestamp: opt_i64(map, "multipleOfTimestamp")?,
            });
            return Ok((kind, FIELDS));
        }

        "Integer" | "Number" => {
            const FIELDS: Fields = &[
                "minimum",
                "maximum",
                "exclusiveMinimum",
                "exclusiveMaximum",
                "multipleOf",
            ];
            let facets = NumberKind {
                minimum: opt_f64(map, "minimum")?,
                maximum: opt_f64(map, "maximum")?,
                exclusive_minimum: opt_f64(map, "exclusiveMinimum")?,
                exclusive_maximum: opt_f64(map, "exclusiveMaximum")?,
                multiple_of: opt_f64(map, "multipleOf")?,
            };
            let kind = if kind_name == "Integer" {
                Kind::Integer(facets)
            } else {
                Kind::Number(facets)
            };
            return Ok((kind, FIELDS));
        }

        "Intersect" => {
            let kind = Kind::Intersect(IntersectKind {
                all_of: opt_schema_vec(map, "allOf")?.unwrap_or_default(),
                unevaluated_properties: opt_additional(map, "unevaluatedProperties")?,
            });
            return Ok((kind, &["allOf", "unevaluatedProperties"]));
        }

        "Literal" => {
            let constant = map
                .get("const")
                .ok_or_else(|| SchemaError::field("const", "a string, number or boolean"))?;
            return Ok((Kind::Literal(read_literal("const", constant)?), &["const"]));
        }

        "MappedKey" => {
            let keys = match map.get("keys") {
                Some(JsonValue::Array(items)) => items
                    .iter()
                    .map(|item| read_literal("keys", item))
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => return Err(SchemaError::field("keys", "an array of strings or numbers")),
                None => Vec::new(),
            };
            return Ok((Kind::MappedKey(MappedKeyKind { keys }), &["keys"]));
        }

        "MappedResult" => {
            let kind = Kind::MappedResult(MappedResultKind {
                properties: opt_schema_map(map, "properties")?.unwrap_or_default(),
            });
            return Ok((kind, &["properties"]));
        }

        "Not" => {
            let kind = Kind::Not(Box::new(req_schema(map, "not")?));
            return Ok((kind, &["not"]));
        }

        "Object" => {
            const FIELDS: Fields = &[
                "properties",
                "required",
                "additionalProperties",
                "minProperties",
                "maxProperties",
            ];
            let required = match map.get("required") {
                Some(JsonValue::Array(items)) => Some(
                    items
                        .iter()
                        .map(|item| {
                            item.as_str()
                                .map(str::to_owned)
                                .ok_or_else(|| SchemaError::field("required", "an array of strings"))
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                Some(_) => return Err(SchemaError::field("required", "an array of strings")),
                None => None,
            };
            let kind = Kind::Object(ObjectKind {
                properties: opt_schema_map(map, "properties")?.unwrap_or_default(),
                required,
                additional_properties: opt_additional(map, "additionalProperties")?,
                min_properties: opt_usize(map, "minProperties")?,
                max_properties: opt_usize(map, "maxProperties")?,
            });
            return Ok((kind, FIELDS));
        }

        "Promise" => {
            let kind = Kind::Promise(Box::new(req_schema(map, "item")?));
            return Ok((kind, &["item"]));
        }

        "Record" => {
            let pattern_properties = match map.get("patternProperties") {
                Some(JsonValue::Object(entries)) => entries
                    .iter()
                    .map(|(pattern, schema)| {
                        Ok((LazyPattern::new(pattern.clone()), Schema::from_json(schema)?))
                    })
                    .collect::<Result<Vec<_>, SchemaError>>()?,
                Some(_) => {
                    return Err(SchemaError::field("patternProperties", "an object of schemas"));
                }
                None => Vec::new(),
            };
            let kind = Kind::Record(RecordKind {
                pattern_properties,
                additional_properties: opt_additional(map, "additionalProperties")?,
            });
            return Ok((kind, &["patternProperties", "additionalProperties"]));
        }

        "Ref" | "This" => {
            let target = map
                .get("$ref")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| SchemaError::field("$ref", "a string identifier"))?
                .to_owned();
            let kind = if kind_name == "Ref" {
                Kind::Ref(target)
            } else {
                Kind::This(target)
            };
            return Ok((kind, &["$ref"]));
        }

        "RegExp" => {
            const FIELDS: Fields = &["source", "flags", "minLength", "maxLength"];
            let source = map
                .get("source")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| SchemaError::field("source", "a string"))?;
            let flags = opt_string(map, "flags")?.unwrap_or_default();
            let kind = Kind::RegExp(RegExpKind {
                pattern: LazyPattern::with_flags(source, flags),
                min_length: opt_usize(map, "minLength")?,
                max_length: opt_usize(map, "maxLength")?,
            });
            return Ok((kind, FIELDS));
        }

        "String" => {
            const FIELDS: Fields = &[
                "minLength",
                "maxLength",
                "pattern",
                "format",
                "contentEncoding",
                "contentMediaType",
            ];
            let kind = Kind::String(StringKind {
                min_length: opt_usize(map, "minLength")?,
                max_length: opt_usize(map, "maxLength")?,
                pattern: opt_string(map, "pattern")?.map(LazyPattern::new),
                format: opt_string(map, "format")?,
                content_encoding: opt_string(map, "contentEncoding")?,
                content_media_type: opt_string(map, "contentMediaType")?,
            });
            return Ok((kind, FIELDS));
        }

        "TemplateLiteral" => {
            let pattern = map
                .get("pattern")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| SchemaError::field("pattern", "a string"))?;
            return Ok((Kind::TemplateLiteral(LazyPattern::new(pattern)), &["pattern"]));
        }

        "Tuple" => {
            const FIELDS: Fields = &["items", "additionalItems", "minItems", "maxItems"];
            let items = opt_schema_vec(map, "items")?.unwrap_or_default();
            let len = items.len();
            let kind = Kind::Tuple(TupleKind {
                min_items: opt_usize(map, "minItems")?.unwrap_or(len),
                max_items: opt_usize(map, "maxItems")?.unwrap_or(len),
                additional_items: opt_bool(map, "additionalItems")?,
                items,
            });
            return Ok((kind, FIELDS));
        }

        "Union" => {
            let kind = Kind::Union(UnionKind {
                any_of: opt_schema_vec(map, "anyOf")?.unwrap_or_default(),
            });
            return Ok((kind, &["anyOf"]));
        }

        "Uint8Array" => {
            const FIELDS: Fields = &["minByteLength", "maxByteLength"];
            let kind = Kind::Uint8Array(BytesKind {
                min_byte_length: opt_usize(map, "minByteLength")?,
                max_byte_length: opt_usize(map, "maxByteLength")?,
            });
            return Ok((kind, FIELDS));
        }

        other => {
            let data: Map<String, JsonValue> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "kind" && !ANNOTATION_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Kind::Custom(CustomKind {
                kind: other.to_owned(),
                data,
            })
        }
    };
    Ok((kind, &[]))
}

/// Which payload fields to exclude while collecting annotations.
trait ConsumedFields {
    fn is_consumed(&self, key: &str) -> bool;
}

struct Consumed(Fields);

impl ConsumedFields for Consumed {
    fn is_consumed(&self, key: &str) -> bool {
        self.0.contains(&key)
    }
}

struct AllFields;

impl ConsumedFields for AllFields {
    fn is_consumed(&self, key: &str) -> bool {
        !ANNOTATION_KEYS.contains(&key)
    }
}

fn read_options(map: &Map<String, JsonValue>, consumed: &dyn ConsumedFields) -> Options {
    let mut options = Options {
        dialect: map.get("$schema").and_then(JsonValue::as_str).map(str::to_owned),
        id: map.get("$id").and_then(JsonValue::as_str).map(str::to_owned),
        title: map.get("title").and_then(JsonValue::as_str).map(str::to_owned),
        description: map
            .get("description")
            .and_then(JsonValue::as_str)
            .map(str::to_owned),
        default: map.get("default").cloned(),
        examples: map.get("examples").cloned(),
        read_only: map.get("readOnly").and_then(JsonValue::as_bool),
        write_only: map.get("writeOnly").and_then(JsonValue::as_bool),
        extra: Map::new(),
    };
    for (key, value) in map {
        if key == "kind" || ANNOTATION_KEYS.contains(&key.as_str()) || consumed.is_consumed(key) {
            continue;
        }
        options.extra.insert(key.clone(), value.clone());
    }
    options
}

fn read_literal(field: &str, value: &JsonValue) -> Result<LiteralValue, SchemaError> {
    match value {
        JsonValue::String(s) => Ok(LiteralValue::String(s.clone())),
        JsonValue::Number(n) => n
            .as_f64()
            .map(LiteralValue::Number)
            .ok_or_else(|| SchemaError::field(field, "a representable number")),
        JsonValue::Bool(b) => Ok(LiteralValue::Bool(*b)),
        _ => Err(SchemaError::field(field, "a string, number or boolean")),
    }
}

fn req_schema(map: &Map<String, JsonValue>, field: &'static str) -> Result<Schema, SchemaError> {
    opt_schema(map, field)?.ok_or_else(|| SchemaError::field(field, "a schema node"))
}

fn opt_schema(
    map: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<Option<Schema>, SchemaError> {
    map.get(field).map(Schema::from_json).transpose()
}

fn opt_schema_vec(
    map: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<Option<Vec<Schema>>, SchemaError> {
    match map.get(field) {
        Some(JsonValue::Array(items)) => Ok(Some(
            items
                .iter()
                .map(Schema::from_json)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Some(_) => Err(SchemaError::field(field, "an array of schema nodes")),
        None => Ok(None),
    }
}

fn opt_schema_map(
    map: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<Option<IndexMap<String, Schema>>, SchemaError> {
    match map.get(field) {
        Some(JsonValue::Object(entries)) => Ok(Some(
            entries
                .iter()
                .map(|(key, value)| Ok((key.clone(), Schema::from_json(value)?)))
                .collect::<Result<IndexMap<_, _>, SchemaError>>()?,
        )),
        Some(_) => Err(SchemaError::field(field, "an object of schema nodes")),
        None => Ok(None),
    }
}

fn opt_additional(
    map: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<Option<AdditionalProperties>, SchemaError> {
    match map.get(field) {
        Some(JsonValue::Bool(allowed)) => Ok(Some(AdditionalProperties::Allowed(*allowed))),
        Some(value @ JsonValue::Object(_)) => Ok(Some(AdditionalProperties::Schema(Box::new(
            Schema::from_json(value)?,
        )))),
        Some(_) => Err(SchemaError::field(field, "a boolean or schema node")),
        None => Ok(None),
    }
}

fn opt_usize(map: &Map<String, JsonValue>, field: &'static str) -> Result<Option<usize>, SchemaError> {
    match map.get(field) {
        Some(value) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| SchemaError::field(field, "a non-negative integer")),
        None => Ok(None),
    }
}

fn opt_i64(map: &Map<String, JsonValue>, field: &'static str) -> Result<Option<i64>, SchemaError> {
    match map.get(field) {
        Some(value) => value
            .as_f64()
            .map(|n| Some(n as i64))
            .ok_or_else(|| SchemaError::field(field, "an integer")),
        None => Ok(None),
    }
}

fn opt_f64(map: &Map<String, JsonValue>, field: &'static str) -> Result<Option<f64>, SchemaError> {
    match map.get(field) {
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| SchemaError::field(field, "a number")),
        None => Ok(None),
    }
}

fn opt_bool(map: &Map<String, JsonValue>, field: &'static str) -> Result<Option<bool>, SchemaError> {
    match map.get(field) {
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| SchemaError::field(field, "a boolean")),
        None => Ok(None),
    }
}

fn opt_string(
    map: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<Option<String>, SchemaError> {
    match map.get(field) {
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_owned()))
            .ok_or_else(|| SchemaError::field(field, "a string")),
        None => Ok(None),
    }
}

fn opt_bigint(
    map: &Map<String, JsonValue>,
    field: &'static str,
) -> Result<Option<BigInt>, SchemaError> {
    match map.get(field) {
        Some(JsonValue::String(s)) => s
            .parse::<BigInt>()
            .map(Some)
            .map_err(|_| SchemaError::field(field, "a decimal integer string")),
        Some(JsonValue::Number(n)) => {
            let Some(float) = n.as_f64() else {
                return Err(SchemaError::field(field, "a representable number"));
            };
            BigInt::from_f64(float.trunc())
                .map(Some)
                .ok_or_else(|| SchemaError::field(field, "a finite number"))
        }
        Some(_) => Err(SchemaError::field(field, "a decimal integer string or number")),
        None => Ok(None),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn round_trip(schema: &Schema) -> Schema {
        Schema::from_json(&schema.to_json()).unwrap()
    }

    #[test]
    fn string_facets_round_trip() {
        let schema = build::string()
            .with_min_length(1)
            .with_max_length(8)
            .with_pattern("^[a-z]+$")
            .with_format("handle");
        assert_eq!(round_trip(&schema), schema);
    }

    #[test]
    fn serialized_shape_uses_json_schema_names() {
        let schema = build::object([("age", build::integer().with_minimum(0.0))])
            .with_required(["age"])
            .with_additional_properties(false);
        assert_eq!(
            schema.to_json(),
            json!({
                "kind": "Object",
                "properties": { "age": { "kind": "Integer", "minimum": 0.0 } },
                "required": ["age"],
                "additionalProperties": false,
            })
        );
    }

    #[test]
    fn bigint_facets_project_to_strings() {
        let schema = build::bigint().with_minimum_bigint(10).with_maximum_bigint(
            "12345678901234567890".parse::<BigInt>().unwrap(),
        );
        let json = schema.to_json();
        assert_eq!(json["minimum"], json!("10"));
        assert_eq!(json["maximum"], json!("12345678901234567890"));
        assert_eq!(round_trip(&schema), schema);
    }

    #[test]
    fn nested_composites_round_trip() {
        let schema = build::union([
            build::tuple([build::string(), build::number()]),
            build::record([("^n_", build::number())]).with_additional_properties(false),
            build::intersect([build::object([("a", build::string())])])
                .with_unevaluated_properties(false),
        ]);
        assert_eq!(round_trip(&schema), schema);
    }

    #[test]
    fn annotations_round_trip_with_extra_fields() {
        let schema = build::number()
            .with_id("Price")
            .with_title("Price")
            .with_default(json!(0))
            .with_extra("unit", json!("cents"));
        let parsed = round_trip(&schema);
        assert_eq!(parsed.options.extra["unit"], json!("cents"));
        assert_eq!(parsed, schema);
    }

    #[test]
    fn unknown_kind_parses_as_custom() {
        let parsed = Schema::from_json(&json!({
            "kind": "Vector",
            "dimensions": 3,
            "title": "A vector",
        }))
        .unwrap();
        let Kind::Custom(custom) = &parsed.kind else {
            panic!("expected custom kind");
        };
        assert_eq!(custom.kind, "Vector");
        assert_eq!(custom.data["dimensions"], json!(3));
        assert_eq!(parsed.options.title.as_deref(), Some("A vector"));
    }

    #[test]
    fn missing_kind_is_rejected() {
        let err = Schema::from_json(&json!({ "minLength": 1 })).unwrap_err();
        assert!(matches!(err, SchemaError::MissingKind));
    }

    #[test]
    fn malformed_facet_is_rejected() {
        let err =
            Schema::from_json(&json!({ "kind": "String", "minLength": "one" })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { .. }));
    }

    #[test]
    fn ref_round_trips_through_dollar_ref() {
        let schema = build::ref_to("Node");
        assert_eq!(schema.to_json(), json!({ "kind": "Ref", "$ref": "Node" }));
        assert_eq!(round_trip(&schema), schema);
    }
}
