//! Recursive-descent validation.
//!
//! [`validate`] walks a value against a schema node and returns every
//! failure as data — an empty result means the value is valid. Dispatch is
//! exhaustive over [`Kind`]; each kind has its own structural rule, and the
//! composite kinds (Union, Intersect, Not, Ref/This) recurse through the
//! same walk. Validation never panics for well-formed schemas; screen
//! schemas once with [`crate::schema::validate_schema`] before use.

mod compound;
mod scalar;

use std::borrow::Cow;

use crate::error::{ErrorKind, ValueError};
use crate::registry::Registry;
use crate::schema::{Kind, Schema};
use crate::value::Value;

/// Validates `value` against `schema`, resolving references through
/// `registry`. Returns every failure; empty means valid.
///
/// # Examples
///
/// ```
/// use typeval::{build, validate, ErrorKind, Registry, Value};
///
/// let schema = build::union([build::string(), build::number()]);
/// let registry = Registry::new();
///
/// assert!(validate(&schema, &registry, &Value::from("1")).is_empty());
/// assert!(validate(&schema, &registry, &Value::from(1.0)).is_empty());
///
/// let errors = validate(&schema, &registry, &Value::Bool(true));
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].kind, ErrorKind::Union);
/// assert_eq!(errors[0].errors.len(), 2);
/// ```
#[must_use]
pub fn validate(schema: &Schema, registry: &Registry, value: &Value) -> Vec<ValueError> {
    Validator::new(registry).validate(schema, value)
}

/// True when `value` satisfies `schema`.
#[must_use]
pub fn is_valid(schema: &Schema, registry: &Registry, value: &Value) -> bool {
    validate(schema, registry, value).is_empty()
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// A reusable validation context borrowing a registry.
///
/// Holds no per-call state: one `Validator` can serve any number of
/// concurrent [`Validator::validate`] calls.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r Registry,
}

impl<'r> Validator<'r> {
    /// Creates a validator resolving references through `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Validates `value` against `schema`.
    #[must_use]
    pub fn validate(&self, schema: &Schema, value: &Value) -> Vec<ValueError> {
        let mut errors = Vec::new();
        let mut path = String::new();
        let mut visit = Visit {
            registry: self.registry,
            active_refs: Vec::new(),
        };
        visit.visit(schema, value, &mut path, &mut errors);
        errors
    }

    /// True when `value` satisfies `schema`.
    #[must_use]
    pub fn is_valid(&self, schema: &Schema, value: &Value) -> bool {
        self.validate(schema, value).is_empty()
    }
}

// ============================================================================
// WALK
// ============================================================================

/// Per-call walk state: the registry plus the reference guard.
pub(crate) struct Visit<'r> {
    pub(crate) registry: &'r Registry,
    /// `(target id, pointer)` pairs currently being resolved. Re-entering
    /// the same pair means the schema consumed no input between
    /// resolutions — a cycle that would otherwise recurse forever.
    active_refs: Vec<(String, String)>,
}

impl Visit<'_> {
    pub(crate) fn visit(
        &mut self,
        schema: &Schema,
        value: &Value,
        path: &mut String,
        out: &mut Vec<ValueError>,
    ) {
        match &schema.kind {
            Kind::Any | Kind::Unknown => {}

            Kind::Never => fail(
                out,
                ErrorKind::Never,
                path,
                "No value satisfies the never schema",
                schema,
                value,
            ),

            Kind::Null => {
                if !value.is_null() {
                    fail(out, ErrorKind::Null, path, "Expected null", schema, value);
                }
            }

            Kind::Undefined => {
                if !value.is_undefined() {
                    fail(
                        out,
                        ErrorKind::Undefined,
                        path,
                        "Expected undefined",
                        schema,
                        value,
                    );
                }
            }

            Kind::Void => {
                if !value.is_undefined() && !value.is_null() {
                    fail(out, ErrorKind::Void, path, "Expected void", schema, value);
                }
            }

            Kind::Boolean => {
                if value.as_bool().is_none() {
                    fail(
                        out,
                        ErrorKind::Boolean,
                        path,
                        "Expected boolean",
                        schema,
                        value,
                    );
                }
            }

            Kind::Symbol => {
                if !matches!(value, Value::Symbol(_)) {
                    fail(out, ErrorKind::Symbol, path, "Expected symbol", schema, value);
                }
            }

            Kind::Literal(constant) => self.check_literal(schema, constant, value, path, out),
            Kind::Number(facets) => {
                self.check_number(schema, ErrorKind::Number, facets, value, path, out);
            }
            Kind::Integer(facets) => {
                self.check_number(schema, ErrorKind::Integer, facets, value, path, out);
            }
            Kind::BigInt(facets) => self.check_bigint(schema, facets, value, path, out),
            Kind::String(facets) => self.check_string(schema, facets, value, path, out),
            Kind::Date(facets) => self.check_date(schema, facets, value, path, out),
            Kind::Uint8Array(facets) => self.check_bytes(schema, facets, value, path, out),
            Kind::RegExp(facets) => self.check_regexp(schema, facets, value, path, out),
            Kind::TemplateLiteral(pattern) => {
                self.check_template_literal(schema, pattern, value, path, out);
            }

            Kind::Array(facets) => self.check_array(schema, facets, value, path, out),
            Kind::Tuple(facets) => self.check_tuple(schema, facets, value, path, out),
            Kind::Object(facets) => self.check_object(schema, facets, value, path, out),
            Kind::Record(facets) => self.check_record(schema, facets, value, path, out),

            Kind::Union(facets) => self.check_union(schema, facets, value, path, out),
            Kind::Intersect(facets) => self.check_intersect(schema, facets, value, path, out),
            Kind::Not(inner) => self.check_not(schema, inner, value, path, out),
            Kind::Ref(target) | Kind::This(target) => {
                self.check_ref(schema, target, value, path, out);
            }

            Kind::Function(_) => fail(
                out,
                ErrorKind::Function,
                path,
                "Function schemas match no runtime value",
                schema,
                value,
            ),
            Kind::Constructor(_) => fail(
                out,
                ErrorKind::Constructor,
                path,
                "Constructor schemas match no runtime value",
                schema,
                value,
            ),
            Kind::Promise(_) => fail(
                out,
                ErrorKind::Promise,
                path,
                "Promise schemas match no runtime value",
                schema,
                value,
            ),
            Kind::Iterator(_) => fail(
                out,
                ErrorKind::Iterator,
                path,
                "Iterator schemas match no runtime value",
                schema,
                value,
            ),
            Kind::AsyncIterator(_) => fail(
                out,
                ErrorKind::AsyncIterator,
                path,
                "Async iterator schemas match no runtime value",
                schema,
                value,
            ),
            Kind::MappedKey(_) => fail(
                out,
                ErrorKind::MappedKey,
                path,
                "Mapped-key schemas are type-level and match no runtime value",
                schema,
                value,
            ),
            Kind::MappedResult(_) => fail(
                out,
                ErrorKind::MappedResult,
                path,
                "Mapped-result schemas are type-level and match no runtime value",
                schema,
                value,
            ),

            Kind::Custom(custom) => match self.registry.kind_hook(&custom.kind) {
                Some(hook) if hook(schema, value) => {}
                Some(_) => fail(
                    out,
                    ErrorKind::Kind,
                    path,
                    format!("Value rejected by custom kind `{}`", custom.kind),
                    schema,
                    value,
                ),
                None => fail(
                    out,
                    ErrorKind::Kind,
                    path,
                    format!("Unknown schema kind `{}`", custom.kind),
                    schema,
                    value,
                ),
            },
        }
    }

    // ------------------------------------------------------------------
    // Composite kinds
    // ------------------------------------------------------------------

    /// Union tie-break policy: every branch is evaluated in declaration
    /// order without short-circuiting. Any passing branch validates the
    /// union; when all fail, exactly one Union error is emitted whose
    /// nested list holds each branch's first failure — so its length
    /// always equals the branch count.
    fn check_union(
        &mut self,
        schema: &Schema,
        facets: &crate::schema::UnionKind,
        value: &Value,
        path: &mut String,
        out: &mut Vec<ValueError>,
    ) {
        let mut branch_failures = Vec::with_capacity(facets.any_of.len());
        let mut matched = false;
        for branch in &facets.any_of {
            let mut branch_errors = Vec::new();
            self.visit(branch, value, path, &mut branch_errors);
            if branch_errors.is_empty() {
                matched = true;
            } else if let Some(first) = branch_errors.into_iter().next() {
                branch_failures.push(first);
            }
        }
        if matched {
            return;
        }
        fail_nested(
            out,
            ErrorKind::Union,
            path,
            format!(
                "Expected value to match at least one of {} union branches",
                facets.any_of.len()
            ),
            schema,
            value,
            branch_failures,
        );
    }

    /// Every branch must independently pass; branch failures surface
    /// directly. With `unevaluatedProperties`, object keys claimed by no
    /// branch are gated afterwards.
    fn check_intersect(
        &mut self,
        schema: &Schema,
        facets: &crate::schema::IntersectKind,
        value: &Value,
        path: &mut String,
        out: &mut Vec<ValueError>,
    ) {
        for branch in &facets.all_of {
            self.visit(branch, value, path, out);
        }

        let Some(gate) = &facets.unevaluated_properties else {
            return;
        };
        let Some(map) = value.as_object() else {
            return;
        };
        let claimed = self.claimed_keys(&facets.all_of);
        for (key, child) in map {
            if claimed.contains(key.as_str()) {
                continue;
            }
            let mark = path.len();
            crate::pointer::push_key(path, key);
            match gate {
                crate::schema::AdditionalProperties::Allowed(true) => {}
                crate::schema::AdditionalProperties::Allowed(false) => fail(
                    out,
                    ErrorKind::Intersect,
                    path,
                    "Property is not declared by any intersection branch",
                    schema,
                    child,
                ),
                crate::schema::AdditionalProperties::Schema(unevaluated) => {
                    self.visit(unevaluated, child, path, out);
                }
            }
            path.truncate(mark);
        }
    }

    /// Passes iff the inner schema fails.
    fn check_not(
        &mut self,
        schema: &Schema,
        inner: &Schema,
        value: &Value,
        path: &mut String,
        out: &mut Vec<ValueError>,
    ) {
        let mut inner_errors = Vec::new();
        self.visit(inner, value, path, &mut inner_errors);
        if inner_errors.is_empty() {
            fail(
                out,
                ErrorKind::Not,
                path,
                "Expected value to not match the inner schema",
                schema,
                value,
            );
        }
    }

    /// Resolves a reference through the registry, guarding against cycles
    /// that consume no input. Descent into finite values bounds recursion
    /// otherwise.
    fn check_ref(
        &mut self,
        schema: &Schema,
        target: &str,
        value: &Value,
        path: &mut String,
        out: &mut Vec<ValueError>,
    ) {
        let Some(resolved) = self.registry.get(target) else {
            tracing::trace!(target = %target, "unresolved schema reference");
            fail(
                out,
                ErrorKind::Ref,
                path,
                format!("Unresolved schema reference `{target}`"),
                schema,
                value,
            );
            return;
        };
        let entry = (target.to_owned(), path.clone());
        if self.active_refs.contains(&entry) {
            fail(
                out,
                ErrorKind::Circular,
                path,
                format!("Circular schema reference `{target}` consumed no input"),
                schema,
                value,
            );
            return;
        }
        self.active_refs.push(entry);
        self.visit(resolved, value, path, out);
        self.active_refs.pop();
    }
}

// ============================================================================
// ERROR HELPERS
// ============================================================================

pub(crate) fn fail(
    out: &mut Vec<ValueError>,
    kind: ErrorKind,
    path: &str,
    message: impl Into<Cow<'static, str>>,
    schema: &Schema,
    value: &Value,
) {
    out.push(ValueError::new(kind, path, message, schema, value));
}

fn fail_nested(
    out: &mut Vec<ValueError>,
    kind: ErrorKind,
    path: &str,
    message: impl Into<Cow<'static, str>>,
    schema: &Schema,
    value: &Value,
    nested: Vec<ValueError>,
) {
    out.push(ValueError::new(kind, path, message, schema, value).with_nested(nested));
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build;

    fn check(schema: &Schema, value: &Value) -> Vec<ValueError> {
        validate(schema, &Registry::new(), value)
    }

    #[test]
    fn any_and_unknown_accept_everything() {
        for value in [Value::Null, Value::from(1.0), Value::from("x"), Value::Undefined] {
            assert!(check(&build::any(), &value).is_empty());
            assert!(check(&build::unknown(), &value).is_empty());
        }
    }

    #[test]
    fn never_rejects_everything() {
        let errors = check(&build::never(), &Value::Null);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Never);
    }

    #[test]
    fn void_accepts_undefined_and_null() {
        assert!(check(&build::void(), &Value::Undefined).is_empty());
        assert!(check(&build::void(), &Value::Null).is_empty());
        assert_eq!(check(&build::void(), &Value::from(0.0)).len(), 1);
    }

    #[test]
    fn not_inverts_the_inner_schema() {
        let schema = build::not(build::string());
        assert!(check(&schema, &Value::from(1.0)).is_empty());
        let errors = check(&schema, &Value::from("s"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Not);
    }

    #[test]
    fn unresolved_reference_is_an_error_not_a_panic() {
        let errors = check(&build::ref_to("Missing"), &Value::Null);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Ref);
    }

    #[test]
    fn consuming_cycle_terminates_on_finite_values() {
        // Node → { next?: Node } descends the value on every hop, so a
        // finite value terminates naturally.
        let node = build::recursive("Node", |node| {
            build::object([("next", node)])
        });
        let mut registry = Registry::new();
        registry.register(node.clone()).unwrap();

        let value = Value::from(serde_json::json!({ "next": { "next": {} } }));
        assert!(validate(&node, &registry, &value).is_empty());
    }

    #[test]
    fn non_consuming_cycle_reports_circular() {
        // A reference that resolves straight back to itself consumes no
        // input between resolutions.
        let mut registry = Registry::new();
        registry.insert("Loop", build::self_ref("Loop"));

        let errors = validate(&build::ref_to("Loop"), &registry, &Value::Null);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Circular);
    }

    #[test]
    fn custom_kind_without_hook_fails_closed() {
        let schema = build::custom("Vector", serde_json::Map::new());
        let errors = check(&schema, &Value::from(1.0));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Kind);
    }

    #[test]
    fn custom_kind_hook_decides() {
        let schema = build::custom("Vector", serde_json::Map::new());
        let mut registry = Registry::new();
        registry.register_kind("Vector", |_, value| value.as_array().is_some());

        assert!(validate(&schema, &registry, &Value::Array(vec![])).is_empty());
        let errors = validate(&schema, &registry, &Value::from(1.0));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Kind);
    }

    #[test]
    fn host_only_kinds_reject_all_values() {
        let schemas = [
            build::function([], build::void()),
            build::constructor([], build::any()),
            build::promise(build::any()),
            build::iterator(build::any()),
            build::async_iterator(build::any()),
            build::mapped_key(["a"]),
            build::mapped_result([("a", build::string())]),
        ];
        for schema in &schemas {
            assert_eq!(check(schema, &Value::Null).len(), 1, "{}", schema.kind_name());
        }
    }

    #[test]
    fn validator_context_is_reusable() {
        let registry = Registry::new();
        let validator = Validator::new(&registry);
        let schema = build::string();
        assert!(validator.is_valid(&schema, &Value::from("a")));
        assert!(!validator.is_valid(&schema, &Value::from(1.0)));
        assert!(validator.is_valid(&schema, &Value::from("b")));
    }
}
