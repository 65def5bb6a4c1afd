//! The runtime value universe judged by the validator.
//!
//! [`Value`] is a superset of the JSON data model: alongside the usual
//! null/boolean/number/string/array/object variants it carries the
//! non-JSON shapes a schema can constrain — an explicit `Undefined`,
//! arbitrary-precision integers, byte buffers, calendar timestamps and
//! symbols. Conversion from [`serde_json::Value`] is lossless; projection
//! back to JSON is explicit and documented on [`Value::to_json`].

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;

// ============================================================================
// VALUE
// ============================================================================

/// A dynamically typed runtime value.
///
/// Values are owned, structurally comparable and cheap to inspect. The
/// validator never mutates them; the converter produces new values rather
/// than editing in place.
///
/// # Examples
///
/// ```
/// use typeval::Value;
/// use serde_json::json;
///
/// let value = Value::from(json!({ "name": "ada", "age": 36 }));
/// assert!(value.as_object().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent value. Distinct from `Null`: object properties that are
    /// missing altogether are not represented at all, but callers feeding
    /// non-JSON input may need a first-class "no value here" marker.
    #[default]
    Undefined,
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision float. Integers are represented here too; the
    /// `Integer` schema kind checks for a zero fractional part.
    Number(f64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// A UTF-8 string.
    String(String),
    /// A symbol with an optional description. No two symbols are ever
    /// produced by this crate; the variant exists so symbol-kinded schemas
    /// have something to accept.
    Symbol(Option<String>),
    /// A byte buffer (the `Uint8Array` analogue).
    Bytes(Vec<u8>),
    /// A calendar timestamp.
    Date(DateTime<Utc>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A keyed map of values. Insertion order is preserved.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Short name of the value's runtime type, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns the string slice if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the float if this is a `Number`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the big integer if this is a `BigInt`.
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the element slice if this is an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the property map if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the byte slice if this is a `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a `Date`.
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(ts) => Some(*ts),
            _ => None,
        }
    }

    /// True for `Undefined`.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Projects the value into JSON.
    ///
    /// The non-JSON variants have fixed projections: `Undefined` becomes
    /// JSON null, `BigInt` its decimal string, `Date` its RFC 3339 string,
    /// `Bytes` its base64 string and `Symbol` its description (or null).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use base64::Engine as _;
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::BigInt(i) => serde_json::Value::String(i.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Symbol(desc) => desc
                .as_ref()
                .map_or(serde_json::Value::Null, |d| {
                    serde_json::Value::String(d.clone())
                }),
            Value::Bytes(bytes) => serde_json::Value::String(
                base64::engine::general_purpose::STANDARD.encode(bytes),
            ),
            Value::Date(ts) => serde_json::Value::String(ts.to_rfc3339()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Symbol(Some(desc)) => write!(f, "Symbol({desc})"),
            Value::Symbol(None) => write!(f, "Symbol()"),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                Value::Number(n.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::BigInt(i)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Date(ts)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_preserves_structure() {
        let value = Value::from(json!({ "a": [1, "two", null, true] }));
        let map = value.as_object().unwrap();
        let items = map["a"].as_array().unwrap();
        assert_eq!(items[0], Value::Number(1.0));
        assert_eq!(items[1], Value::String("two".into()));
        assert_eq!(items[2], Value::Null);
        assert_eq!(items[3], Value::Bool(true));
    }

    #[test]
    fn json_round_trip_for_json_subset() {
        let original = json!({ "x": [1.5, "s", false], "y": null });
        assert_eq!(Value::from(original.clone()).to_json(), original);
    }

    #[test]
    fn bigint_projects_to_decimal_string() {
        let value = Value::BigInt("12345678901234567890".parse().unwrap());
        assert_eq!(value.to_json(), json!("12345678901234567890"));
    }

    #[test]
    fn undefined_is_distinct_from_null() {
        assert_ne!(Value::Undefined, Value::Null);
        assert!(Value::Undefined.is_undefined());
        assert!(!Value::Null.is_undefined());
    }

    #[test]
    fn structural_equality_on_objects() {
        let left = Value::from(json!({ "a": 1, "b": [true] }));
        let right = Value::from(json!({ "a": 1, "b": [true] }));
        assert_eq!(left, right);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::from(1.0).kind_name(), "number");
        assert_eq!(Value::Bytes(vec![1]).kind_name(), "bytes");
    }
}
