//! Scalar checks: literals, numerics, strings, dates, bytes and regexes.
//!
//! Every facet of a scalar kind is checked independently — a string that is
//! both too short and pattern-breaking reports both failures.

use base64::Engine as _;
use num_traits::Zero as _;

use crate::error::ErrorKind;
use crate::schema::{
    BigIntKind, BytesKind, DateKind, LazyPattern, LiteralValue, NumberKind, RegExpKind, Schema,
    StringKind,
};
use crate::validate::{fail, Visit};
use crate::value::Value;

impl Visit<'_> {
    pub(super) fn check_literal(
        &self,
        schema: &Schema,
        constant: &LiteralValue,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let matches = match (constant, value) {
            (LiteralValue::String(expected), Value::String(actual)) => expected == actual,
            (LiteralValue::Number(expected), Value::Number(actual)) => expected == actual,
            (LiteralValue::Bool(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        };
        if !matches {
            let rendered = match constant {
                LiteralValue::String(s) => format!("\"{s}\""),
                LiteralValue::Number(n) => n.to_string(),
                LiteralValue::Bool(b) => b.to_string(),
            };
            fail(
                out,
                ErrorKind::Literal,
                path,
                format!("Expected literal {rendered}"),
                schema,
                value,
            );
        }
    }

    pub(super) fn check_number(
        &self,
        schema: &Schema,
        kind: ErrorKind,
        facets: &NumberKind,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let expected = if kind == ErrorKind::Integer {
            "Expected integer"
        } else {
            "Expected number"
        };
        let Some(number) = value.as_f64() else {
            fail(out, kind, path, expected, schema, value);
            return;
        };
        if !number.is_finite() {
            fail(out, kind, path, "Expected a finite number", schema, value);
            return;
        }
        if kind == ErrorKind::Integer && number.fract() != 0.0 {
            fail(out, kind, path, expected, schema, value);
            return;
        }

        if let Some(min) = facets.minimum {
            if number < min {
                fail(out, kind, path, format!("Must be >= {min}"), schema, value);
            }
        }
        if let Some(max) = facets.maximum {
            if number > max {
                fail(out, kind, path, format!("Must be <= {max}"), schema, value);
            }
        }
        if let Some(min) = facets.exclusive_minimum {
            if number <= min {
                fail(out, kind, path, format!("Must be > {min}"), schema, value);
            }
        }
        if let Some(max) = facets.exclusive_maximum {
            if number >= max {
                fail(out, kind, path, format!("Must be < {max}"), schema, value);
            }
        }
        if let Some(factor) = facets.multiple_of {
            if factor == 0.0 || number % factor != 0.0 {
                fail(
                    out,
                    kind,
                    path,
                    format!("Must be a multiple of {factor}"),
                    schema,
                    value,
                );
            }
        }
    }

    pub(super) fn check_bigint(
        &self,
        schema: &Schema,
        facets: &BigIntKind,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(number) = value.as_bigint() else {
            fail(out, ErrorKind::BigInt, path, "Expected bigint", schema, value);
            return;
        };

        if let Some(min) = &facets.minimum {
            if number < min {
                fail(
                    out,
                    ErrorKind::BigInt,
                    path,
                    format!("Must be >= {min}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = &facets.maximum {
            if number > max {
                fail(
                    out,
                    ErrorKind::BigInt,
                    path,
                    format!("Must be <= {max}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(min) = &facets.exclusive_minimum {
            if number <= min {
                fail(
                    out,
                    ErrorKind::BigInt,
                    path,
                    format!("Must be > {min}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = &facets.exclusive_maximum {
            if number >= max {
                fail(
                    out,
                    ErrorKind::BigInt,
                    path,
                    format!("Must be < {max}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(factor) = &facets.multiple_of {
            // Exact integer division; zero divides nothing.
            if factor.is_zero() || !(number % factor).is_zero() {
                fail(
                    out,
                    ErrorKind::BigInt,
                    path,
                    format!("Must be a multiple of {factor}"),
                    schema,
                    value,
                );
            }
        }
    }

    pub(super) fn check_string(
        &self,
        schema: &Schema,
        facets: &StringKind,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(text) = value.as_str() else {
            fail(out, ErrorKind::String, path, "Expected string", schema, value);
            return;
        };
        let length = text.chars().count();

        if let Some(min) = facets.min_length {
            if length < min {
                fail(
                    out,
                    ErrorKind::String,
                    path,
                    format!("Must be at least {min} characters"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.max_length {
            if length > max {
                fail(
                    out,
                    ErrorKind::String,
                    path,
                    format!("Must be at most {max} characters"),
                    schema,
                    value,
                );
            }
        }
        if let Some(pattern) = &facets.pattern {
            match pattern.is_match(text) {
                Some(true) => {}
                Some(false) => fail(
                    out,
                    ErrorKind::String,
                    path,
                    format!("Must match pattern `{}`", pattern.source()),
                    schema,
                    value,
                ),
                None => fail(
                    out,
                    ErrorKind::String,
                    path,
                    format!(
                        "Pattern `{}` is not a valid regular expression",
                        pattern.source()
                    ),
                    schema,
                    value,
                ),
            }
        }
        if let Some(format) = &facets.format {
            // Unregistered format names are annotations and pass.
            if let Some(check) = self.registry.format(format) {
                if !check(text) {
                    fail(
                        out,
                        ErrorKind::String,
                        path,
                        format!("Must match format `{format}`"),
                        schema,
                        value,
                    );
                }
            }
        }
        if facets.content_encoding.as_deref() == Some("base64")
            && base64::engine::general_purpose::STANDARD.decode(text).is_err()
        {
            fail(
                out,
                ErrorKind::String,
                path,
                "Must be base64-encoded",
                schema,
                value,
            );
        }
    }

    pub(super) fn check_date(
        &self,
        schema: &Schema,
        facets: &DateKind,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(date) = value.as_date() else {
            fail(out, ErrorKind::Date, path, "Expected date", schema, value);
            return;
        };
        let timestamp = date.timestamp_millis();

        if let Some(min) = facets.minimum_timestamp {
            if timestamp < min {
                fail(
                    out,
                    ErrorKind::Date,
                    path,
                    format!("Timestamp must be >= {min}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.maximum_timestamp {
            if timestamp > max {
                fail(
                    out,
                    ErrorKind::Date,
                    path,
                    format!("Timestamp must be <= {max}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(min) = facets.exclusive_minimum_timestamp {
            if timestamp <= min {
                fail(
                    out,
                    ErrorKind::Date,
                    path,
                    format!("Timestamp must be > {min}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.exclusive_maximum_timestamp {
            if timestamp >= max {
                fail(
                    out,
                    ErrorKind::Date,
                    path,
                    format!("Timestamp must be < {max}"),
                    schema,
                    value,
                );
            }
        }
        if let Some(factor) = facets.multiple_of_timestamp {
            if factor == 0 || timestamp % factor != 0 {
                fail(
                    out,
                    ErrorKind::Date,
                    path,
                    format!("Timestamp must be a multiple of {factor}"),
                    schema,
                    value,
                );
            }
        }
    }

    pub(super) fn check_bytes(
        &self,
        schema: &Schema,
        facets: &BytesKind,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(bytes) = value.as_bytes() else {
            fail(
                out,
                ErrorKind::Uint8Array,
                path,
                "Expected byte buffer",
                schema,
                value,
            );
            return;
        };

        if let Some(min) = facets.min_byte_length {
            if bytes.len() < min {
                fail(
                    out,
                    ErrorKind::Uint8Array,
                    path,
                    format!("Must be at least {min} bytes"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.max_byte_length {
            if bytes.len() > max {
                fail(
                    out,
                    ErrorKind::Uint8Array,
                    path,
                    format!("Must be at most {max} bytes"),
                    schema,
                    value,
                );
            }
        }
    }

    pub(super) fn check_regexp(
        &self,
        schema: &Schema,
        facets: &RegExpKind,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(text) = value.as_str() else {
            fail(out, ErrorKind::RegExp, path, "Expected string", schema, value);
            return;
        };
        let length = text.chars().count();

        if let Some(min) = facets.min_length {
            if length < min {
                fail(
                    out,
                    ErrorKind::RegExp,
                    path,
                    format!("Must be at least {min} characters"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.max_length {
            if length > max {
                fail(
                    out,
                    ErrorKind::RegExp,
                    path,
                    format!("Must be at most {max} characters"),
                    schema,
                    value,
                );
            }
        }
        match facets.pattern.is_match(text) {
            Some(true) => {}
            Some(false) => fail(
                out,
                ErrorKind::RegExp,
                path,
                format!("Must match pattern `{}`", facets.pattern.source()),
                schema,
                value,
            ),
            None => fail(
                out,
                ErrorKind::RegExp,
                path,
                format!(
                    "Pattern `{}` is not a valid regular expression",
                    facets.pattern.source()
                ),
                schema,
                value,
            ),
        }
    }

    pub(super) fn check_template_literal(
        &self,
        schema: &Schema,
        pattern: &LazyPattern,
        value: &Value,
        path: &str,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(text) = value.as_str() else {
            fail(
                out,
                ErrorKind::TemplateLiteral,
                path,
                "Expected string",
                schema,
                value,
            );
            return;
        };
        match pattern.is_match(text) {
            Some(true) => {}
            Some(false) => fail(
                out,
                ErrorKind::TemplateLiteral,
                path,
                format!("Must match template pattern `{}`", pattern.source()),
                schema,
                value,
            ),
            None => fail(
                out,
                ErrorKind::TemplateLiteral,
                path,
                format!(
                    "Pattern `{}` is not a valid regular expression",
                    pattern.source()
                ),
                schema,
                value,
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
