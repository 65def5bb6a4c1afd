//! Best-effort value coercion.
//!
//! [`convert`] nudges a raw input toward the shape a schema expects before
//! validation: `"42"` becomes `42` for a Number schema, `"true"` becomes
//! `true` for a Boolean schema, decimal strings become exact big integers
//! for a BigInt schema. Conversion is advisory and non-throwing — any rule
//! that does not apply returns the input unchanged for the validator to
//! judge, and a failed conversion on one child never aborts its siblings.

use chrono::{DateTime, NaiveDate, TimeZone as _, Utc};
use num_bigint::BigInt;
use num_traits::FromPrimitive as _;

use crate::registry::Registry;
use crate::schema::{Kind, LiteralValue, Schema};
use crate::value::Value;

/// Converts `value` toward the shape implied by `schema`, resolving
/// references through `registry`. Returns the input unchanged wherever no
/// rule applies; only [`crate::validate`] decides validity.
///
/// # Examples
///
/// ```
/// use typeval::{build, convert, Registry, Value};
/// use num_bigint::BigInt;
///
/// let registry = Registry::new();
/// let converted = convert(
///     &build::bigint(),
///     &registry,
///     &Value::from("12345678901234567890.123"),
/// );
/// assert_eq!(
///     converted,
///     Value::BigInt("12345678901234567890".parse::<BigInt>().unwrap()),
/// );
/// ```
#[must_use]
pub fn convert(schema: &Schema, registry: &Registry, value: &Value) -> Value {
    Convert { registry }.apply(schema, value, &mut Vec::new())
}

// ============================================================================
// CONVERSION WALK
// ============================================================================

struct Convert<'r> {
    registry: &'r Registry,
}

impl Convert<'_> {
    /// `ref_chain` tracks reference targets resolved since the last
    /// structural descent; a repeat means a pure reference loop, which
    /// converts to the input unchanged.
    fn apply(&self, schema: &Schema, value: &Value, ref_chain: &mut Vec<String>) -> Value {
        match &schema.kind {
            Kind::Boolean => try_boolean(value),
            Kind::Number(_) | Kind::Integer(_) => try_number(value),
            Kind::BigInt(_) => try_bigint(value),
            Kind::String(_) => try_string(value),
            Kind::Date(_) => try_date(value),
            Kind::Null => match value {
                Value::String(s) if s == "null" => Value::Null,
                other => other.clone(),
            },
            Kind::Undefined => match value {
                Value::String(s) if s == "undefined" => Value::Undefined,
                other => other.clone(),
            },

            // A literal converts toward its constant's type.
            Kind::Literal(constant) => match constant {
                LiteralValue::String(_) => try_string(value),
                LiteralValue::Number(_) => try_number(value),
                LiteralValue::Bool(_) => try_boolean(value),
            },

            Kind::Array(facets) => match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .map(|item| self.apply(&facets.items, item, &mut Vec::new()))
                        .collect(),
                ),
                other => other.clone(),
            },

            Kind::Tuple(facets) => match value {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| match facets.items.get(index) {
                            Some(declared) => self.apply(declared, item, &mut Vec::new()),
                            None => item.clone(),
                        })
                        .collect(),
                ),
                other => other.clone(),
            },

            Kind::Object(facets) => match value {
                Value::Object(map) => Value::Object(
                    map.iter()
                        .map(|(key, child)| {
                            let converted = match facets.properties.get(key) {
                                Some(declared) => self.apply(declared, child, &mut Vec::new()),
                                None => child.clone(),
                            };
                            (key.clone(), converted)
                        })
                        .collect(),
                ),
                other => other.clone(),
            },

            Kind::Record(facets) => match value {
                Value::Object(map) => Value::Object(
                    map.iter()
                        .map(|(key, child)| (key.clone(), self.apply_record(facets, key, child)))
                        .collect(),
                ),
                other => other.clone(),
            },

            // The first branch whose converted result validates wins;
            // otherwise the input passes through untouched.
            Kind::Union(facets) => {
                for branch in &facets.any_of {
                    let candidate = self.apply(branch, value, ref_chain);
                    if crate::validate::is_valid(branch, self.registry, &candidate) {
                        return candidate;
                    }
                }
                value.clone()
            }

            Kind::Ref(target) | Kind::This(target) => {
                if ref_chain.iter().any(|seen| seen == target) {
                    return value.clone();
                }
                match self.registry.get(target) {
                    Some(resolved) => {
                        ref_chain.push(target.clone());
                        let converted = self.apply(resolved, value, ref_chain);
                        ref_chain.pop();
                        converted
                    }
                    None => value.clone(),
                }
            }

            // No coercion rule: pass through for the validator to judge.
            Kind::Any
            | Kind::Unknown
            | Kind::Never
            | Kind::Void
            | Kind::Symbol
            | Kind::Uint8Array(_)
            | Kind::RegExp(_)
            | Kind::TemplateLiteral(_)
            | Kind::Not(_)
            | Kind::Intersect(_)
            | Kind::Function(_)
            | Kind::Constructor(_)
            | Kind::Promise(_)
            | Kind::Iterator(_)
            | Kind::AsyncIterator(_)
            | Kind::MappedKey(_)
            | Kind::MappedResult(_)
            | Kind::Custom(_) => value.clone(),
        }
    }

    fn apply_record(&self, facets: &crate::schema::RecordKind, key: &str, child: &Value) -> Value {
        for (pattern, declared) in &facets.pattern_properties {
            if pattern.is_match(key) == Some(true) {
                return self.apply(declared, child, &mut Vec::new());
            }
        }
        if let Some(crate::schema::AdditionalProperties::Schema(additional)) =
            &facets.additional_properties
        {
            return self.apply(additional, child, &mut Vec::new());
        }
        child.clone()
    }
}

// ============================================================================
// SCALAR RULES
// ============================================================================

fn try_boolean(value: &Value) -> Value {
    match value {
        Value::String(s) if s == "true" => Value::Bool(true),
        Value::String(s) if s == "false" => Value::Bool(false),
        Value::Number(n) if *n == 1.0 => Value::Bool(true),
        Value::Number(n) if *n == 0.0 => Value::Bool(false),
        other => other.clone(),
    }
}

fn try_number(value: &Value) -> Value {
    match value {
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Value::Number(parsed),
            _ => value.clone(),
        },
        Value::Bool(true) => Value::Number(1.0),
        Value::Bool(false) => Value::Number(0.0),
        other => other.clone(),
    }
}

fn try_bigint(value: &Value) -> Value {
    match value {
        Value::String(s) => match s.trim() {
            "true" => Value::BigInt(BigInt::from(1)),
            "false" => Value::BigInt(BigInt::from(0)),
            trimmed => parse_bigint_decimal(trimmed).map_or_else(|| value.clone(), Value::BigInt),
        },
        Value::Number(n) if n.is_finite() => {
            BigInt::from_f64(n.trunc()).map_or_else(|| value.clone(), Value::BigInt)
        }
        Value::Bool(true) => Value::BigInt(BigInt::from(1)),
        Value::Bool(false) => Value::BigInt(BigInt::from(0)),
        other => other.clone(),
    }
}

fn try_string(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::String(render_number(*n)),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::BigInt(i) => Value::String(i.to_string()),
        other => other.clone(),
    }
}

fn try_date(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return Value::Date(parsed.with_timezone(&Utc));
            }
            if let Ok(parsed) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
                    return Value::Date(Utc.from_utc_datetime(&midnight));
                }
            }
            value.clone()
        }
        Value::Number(n) if n.is_finite() => match Utc.timestamp_millis_opt(n.trunc() as i64) {
            chrono::LocalResult::Single(date) => Value::Date(date),
            _ => value.clone(),
        },
        other => other.clone(),
    }
}

/// Parses a decimal string into a big integer, truncating any fraction
/// toward zero: optional sign, a non-empty run of digits, then optionally a
/// `.` followed by digits. Anything else is malformed. The digit run is
/// parsed with arbitrary precision.
fn parse_bigint_decimal(text: &str) -> Option<BigInt> {
    let (negative, rest) = match *text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_end = rest
        .as_bytes()
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let (integer_digits, remainder) = rest.split_at(digits_end);
    if !remainder.is_empty() {
        let fraction = remainder.strip_prefix('.')?;
        if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
    }
    let magnitude = BigInt::parse_bytes(integer_digits.as_bytes(), 10)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Renders a number the way a dynamic host would: integral values print
/// without a fractional part.
fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;
    use chrono::TimeZone as _;
    use serde_json::json;

    fn run(schema: &Schema, value: Value) -> Value {
        convert(schema, &Registry::new(), &value)
    }

    fn big(text: &str) -> Value {
        Value::BigInt(text.parse::<BigInt>().unwrap())
    }

    #[test]
    fn boolean_from_exact_strings_only() {
        let schema = build::boolean();
        assert_eq!(run(&schema, Value::from("true")), Value::Bool(true));
        assert_eq!(run(&schema, Value::from("false")), Value::Bool(false));
        assert_eq!(run(&schema, Value::from("True")), Value::from("True"));
        assert_eq!(run(&schema, Value::from("TRUE")), Value::from("TRUE"));
    }

    #[test]
    fn number_from_decimal_string_trims_whitespace() {
        let schema = build::number();
        assert_eq!(run(&schema, Value::from(" 3.25 ")), Value::Number(3.25));
        assert_eq!(run(&schema, Value::from("-40")), Value::Number(-40.0));
        assert_eq!(run(&schema, Value::from("nope")), Value::from("nope"));
    }

    #[test]
    fn bigint_from_integral_strings() {
        let schema = build::bigint();
        assert_eq!(run(&schema, Value::from("1")), big("1"));
        assert_eq!(
            run(&schema, Value::from("12345678901234567890")),
            big("12345678901234567890")
        );
        assert_eq!(
            run(&schema, Value::from("-12345678901234567890")),
            big("-12345678901234567890")
        );
    }

    #[test]
    fn bigint_from_decimal_strings_truncates_toward_zero() {
        let schema = build::bigint();
        assert_eq!(run(&schema, Value::from("3.14")), big("3"));
        assert_eq!(
            run(&schema, Value::from("12345678901234567890.123")),
            big("12345678901234567890")
        );
        assert_eq!(
            run(&schema, Value::from("-12345678901234567890.123")),
            big("-12345678901234567890")
        );
    }

    #[test]
    fn bigint_leaves_malformed_strings_unchanged() {
        let schema = build::bigint();
        for text in [".5", "abc", "1.2.3", "12a", "-", ""] {
            assert_eq!(run(&schema, Value::from(text)), Value::from(text));
        }
    }

    #[test]
    fn bigint_from_numbers_truncates_toward_zero() {
        let schema = build::bigint();
        assert_eq!(run(&schema, Value::from(1.0)), big("1"));
        assert_eq!(run(&schema, Value::from(3.14)), big("3"));
        assert_eq!(run(&schema, Value::from(-3.14)), big("-3"));
    }

    #[test]
    fn bigint_from_booleans_and_their_string_forms() {
        let schema = build::bigint();
        assert_eq!(run(&schema, Value::Bool(true)), big("1"));
        assert_eq!(run(&schema, Value::Bool(false)), big("0"));
        assert_eq!(run(&schema, Value::from("true")), big("1"));
        assert_eq!(run(&schema, Value::from("false")), big("0"));
    }

    #[test]
    fn string_from_scalars() {
        let schema = build::string();
        assert_eq!(run(&schema, Value::from(1.0)), Value::from("1"));
        assert_eq!(run(&schema, Value::from(1.5)), Value::from("1.5"));
        assert_eq!(run(&schema, Value::Bool(true)), Value::from("true"));
        assert_eq!(run(&schema, big("10")), Value::from("10"));
    }

    #[test]
    fn date_from_rfc3339_and_epoch_millis() {
        let schema = build::date();
        let parsed = run(&schema, Value::from("2024-05-01T12:00:00Z"));
        assert!(matches!(parsed, Value::Date(_)));

        let from_millis = run(&schema, Value::from(1_000.0));
        assert_eq!(
            from_millis,
            Value::Date(Utc.timestamp_millis_opt(1_000).unwrap())
        );

        assert_eq!(run(&schema, Value::from("soon")), Value::from("soon"));
    }

    #[test]
    fn date_from_calendar_string() {
        let schema = build::date();
        let parsed = run(&schema, Value::from("2024-05-01"));
        let Value::Date(date) = parsed else {
            panic!("expected a date");
        };
        assert_eq!(date.timestamp_millis() % 86_400_000, 0);
    }

    #[test]
    fn null_and_undefined_from_their_string_forms() {
        assert_eq!(run(&build::null(), Value::from("null")), Value::Null);
        assert_eq!(
            run(&build::undefined(), Value::from("undefined")),
            Value::Undefined
        );
    }

    #[test]
    fn literal_converts_toward_its_constant_type() {
        assert_eq!(run(&build::literal(5), Value::from("5")), Value::Number(5.0));
        assert_eq!(
            run(&build::literal(true), Value::from("true")),
            Value::Bool(true)
        );
    }

    #[test]
    fn composite_conversion_recurses_and_skips_failures() {
        let schema = build::object([
            ("count", build::number()),
            ("active", build::boolean()),
        ]);
        let converted = run(
            &schema,
            Value::from(json!({ "count": "2", "active": "nope", "other": "1" })),
        );
        let map = converted.as_object().unwrap();
        // One child fails to convert; its siblings still convert, and
        // undeclared keys pass through untouched.
        assert_eq!(map["count"], Value::Number(2.0));
        assert_eq!(map["active"], Value::from("nope"));
        assert_eq!(map["other"], Value::from("1"));
    }

    #[test]
    fn tuple_conversion_is_positional() {
        let schema = build::tuple([build::number(), build::boolean()]);
        let converted = run(&schema, Value::from(json!(["1", "true", "extra"])));
        assert_eq!(
            converted,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Bool(true),
                Value::from("extra"),
            ])
        );
    }

    #[test]
    fn record_converts_through_the_claiming_pattern() {
        let schema = build::record([("^n_", build::number())]);
        let converted = run(&schema, Value::from(json!({ "n_a": "1", "other": "2" })));
        let map = converted.as_object().unwrap();
        assert_eq!(map["n_a"], Value::Number(1.0));
        assert_eq!(map["other"], Value::from("2"));
    }

    #[test]
    fn union_takes_the_first_branch_whose_conversion_validates() {
        let schema = build::union([build::number(), build::boolean()]);
        assert_eq!(run(&schema, Value::from("2")), Value::Number(2.0));
        assert_eq!(run(&schema, Value::from("true")), Value::Bool(true));
        assert_eq!(run(&schema, Value::from("x")), Value::from("x"));
    }

    #[test]
    fn references_convert_through_the_registry() {
        let mut registry = Registry::new();
        registry.register(build::number().with_id("Count")).unwrap();
        let converted = convert(&build::ref_to("Count"), &registry, &Value::from("7"));
        assert_eq!(converted, Value::Number(7.0));
    }

    #[test]
    fn unresolved_reference_passes_through() {
        let registry = Registry::new();
        let value = Value::from("7");
        assert_eq!(convert(&build::ref_to("Missing"), &registry, &value), value);
    }

    #[test]
    fn pure_reference_loops_terminate() {
        let mut registry = Registry::new();
        registry.insert("Loop", build::self_ref("Loop"));
        let value = Value::from("x");
        assert_eq!(convert(&build::ref_to("Loop"), &registry, &value), value);
    }

    #[test]
    fn conversion_is_advisory_only() {
        // A converted value still has to pass validation on its own.
        let schema = build::number().with_minimum(10.0);
        let registry = Registry::new();
        let converted = convert(&schema, &registry, &Value::from("3"));
        assert_eq!(converted, Value::Number(3.0));
        assert!(!crate::validate::is_valid(&schema, &registry, &converted));
    }
}
