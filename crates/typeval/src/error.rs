//! Structured validation errors.
//!
//! Validation failures are data, never panics: [`crate::validate`] returns a
//! (possibly empty) sequence of [`ValueError`] and the empty case means
//! "valid". Each error pins down the failing check (`kind`), where in the
//! input it happened (`path`, a JSON pointer), the schema node responsible
//! and the offending value. Composite checks (Union, Intersect) carry the
//! per-branch failures in `errors`.
//!
//! Message strings use `Cow<'static, str>` so the common static-text case
//! allocates nothing.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::schema::Schema;
use crate::value::Value;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Discriminant identifying which schema kind produced an error.
///
/// One variant per schema kind, plus the composite kinds and the two
/// "this value cannot be judged" conditions: an unresolved reference
/// ([`ErrorKind::Ref`]) and a schema cycle that consumes no input
/// ([`ErrorKind::Circular`]). A [`ErrorKind::Kind`] error reports a custom
/// schema kind that has no registered validation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Any,
    Array,
    AsyncIterator,
    BigInt,
    Boolean,
    Constructor,
    Date,
    Function,
    Integer,
    Intersect,
    Iterator,
    Kind,
    Literal,
    MappedKey,
    MappedResult,
    Never,
    Not,
    Null,
    Number,
    Object,
    Promise,
    Record,
    Ref,
    RegExp,
    String,
    Symbol,
    TemplateLiteral,
    Tuple,
    Undefined,
    Union,
    Uint8Array,
    Unknown,
    Void,
    Circular,
}

impl ErrorKind {
    /// True for the composite kinds whose errors carry nested branch
    /// failures.
    #[must_use]
    pub fn is_composite(self) -> bool {
        matches!(self, ErrorKind::Union | ErrorKind::Intersect)
    }
}

// ============================================================================
// VALUE ERROR
// ============================================================================

/// One way a value fails to satisfy a schema node.
///
/// # Examples
///
/// ```
/// use typeval::{build, validate, ErrorKind, Registry, Value};
///
/// let schema = build::string();
/// let errors = validate(&schema, &Registry::new(), &Value::from(1.0));
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].kind, ErrorKind::String);
/// assert_eq!(errors[0].path, "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueError {
    /// Which check failed.
    #[serde(rename = "type")]
    pub kind: ErrorKind,

    /// JSON pointer locating the offending value inside the input
    /// (empty string = the root value).
    pub path: String,

    /// Human-readable description of the failure.
    pub message: Cow<'static, str>,

    /// The schema node responsible for the check.
    pub schema: Schema,

    /// The offending value, as seen by the check.
    pub value: Value,

    /// Per-branch failures. Non-empty only for composite kinds; for a
    /// Union its length equals the number of branches evaluated.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValueError>,
}

impl ValueError {
    /// Creates an error for a single failed check.
    pub fn new(
        kind: ErrorKind,
        path: impl Into<String>,
        message: impl Into<Cow<'static, str>>,
        schema: &Schema,
        value: &Value,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
            schema: schema.clone(),
            value: value.clone(),
            errors: Vec::new(),
        }
    }

    /// Attaches per-branch failures (composite kinds only).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested(mut self, errors: Vec<ValueError>) -> Self {
        self.errors = errors;
        self
    }

    /// True if this error carries nested branch failures.
    #[must_use]
    pub fn has_nested(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total number of errors in this tree, including `self`.
    #[must_use]
    pub fn total_error_count(&self) -> usize {
        1 + self
            .errors
            .iter()
            .map(ValueError::total_error_count)
            .sum::<usize>()
    }

    /// Flattens the error tree into a depth-first list.
    #[must_use]
    pub fn flatten(&self) -> Vec<&ValueError> {
        let mut result = vec![self];
        for nested in &self.errors {
            result.extend(nested.flatten());
        }
        result
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)?;
        } else {
            write!(f, "[{}] {}", self.path, self.message)?;
        }
        if !self.errors.is_empty() {
            write!(f, " ({} branch failures)", self.errors.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValueError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;

    #[test]
    fn static_messages_do_not_allocate() {
        let error = ValueError::new(
            ErrorKind::String,
            "/name",
            "Expected string",
            &build::string(),
            &Value::Null,
        );
        assert!(matches!(error.message, Cow::Borrowed(_)));
    }

    #[test]
    fn display_includes_path() {
        let error = ValueError::new(
            ErrorKind::Number,
            "/a/0",
            "Expected number",
            &build::number(),
            &Value::Null,
        );
        assert_eq!(error.to_string(), "[/a/0] Expected number");
    }

    #[test]
    fn display_without_path() {
        let error = ValueError::new(
            ErrorKind::Boolean,
            "",
            "Expected boolean",
            &build::boolean(),
            &Value::Null,
        );
        assert_eq!(error.to_string(), "Expected boolean");
    }

    #[test]
    fn nested_error_accounting() {
        let inner = ValueError::new(
            ErrorKind::String,
            "",
            "Expected string",
            &build::string(),
            &Value::Bool(true),
        );
        let outer = ValueError::new(
            ErrorKind::Union,
            "",
            "Expected value to match one of 1 branches",
            &build::union([build::string()]),
            &Value::Bool(true),
        )
        .with_nested(vec![inner]);

        assert!(outer.has_nested());
        assert_eq!(outer.total_error_count(), 2);
        assert_eq!(outer.flatten().len(), 2);
        assert!(outer.kind.is_composite());
    }
}
