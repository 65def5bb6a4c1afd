//! The schema node: a kind tag, its payload and shared annotations.

use num_bigint::BigInt;
use serde_json::Value as JsonValue;

use crate::error::ValueError;
use crate::registry::Registry;
use crate::schema::kind::{AdditionalProperties, Kind};
use crate::schema::pattern::LazyPattern;
use crate::schema::Options;
use crate::value::Value;

/// A schema node: one [`Kind`] plus its [`Options`] annotation bag.
///
/// Nodes are built once (usually through [`crate::schema::build`]), treated
/// as immutable and shared by reference across any number of validation and
/// conversion calls.
///
/// Constraint facets are set through chainable `with_*` methods. A facet
/// setter applies to the kinds that carry that facet and leaves every other
/// kind unchanged — the same open-annotation model JSON Schema uses for
/// options that do not apply to a type.
///
/// # Examples
///
/// ```
/// use typeval::{build, is_valid, Registry, Value};
///
/// let username = build::string().with_min_length(3).with_max_length(20);
/// let registry = Registry::new();
/// assert!(is_valid(&username, &registry, &Value::from("ada")));
/// assert!(!is_valid(&username, &registry, &Value::from("a")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// The structural type of this node.
    pub kind: Kind,
    /// Shared annotations.
    pub options: Options,
}

impl Schema {
    /// Wraps a kind with empty annotations.
    #[must_use]
    pub fn from_kind(kind: Kind) -> Self {
        Self {
            kind,
            options: Options::default(),
        }
    }

    /// The kind tag string.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// The `$id` annotation, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.options.id.as_deref()
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Sets the `$id` this node can be registered under.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.options.id = Some(id.into());
        self
    }

    /// Sets the `$schema` dialect marker.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.options.dialect = Some(dialect.into());
        self
    }

    /// Sets the title annotation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    /// Sets the description annotation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    /// Sets the default-value annotation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_default(mut self, default: JsonValue) -> Self {
        self.options.default = Some(default);
        self
    }

    /// Sets the examples annotation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_examples(mut self, examples: JsonValue) -> Self {
        self.options.examples = Some(examples);
        self
    }

    /// Marks the node read-only.
    #[must_use = "builder methods must be chained or built"]
    pub fn read_only(mut self) -> Self {
        self.options.read_only = Some(true);
        self
    }

    /// Marks the node write-only.
    #[must_use = "builder methods must be chained or built"]
    pub fn write_only(mut self) -> Self {
        self.options.write_only = Some(true);
        self
    }

    /// Attaches an arbitrary extension field.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_extra(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.options.extra.insert(key.into(), value);
        self
    }

    // ------------------------------------------------------------------
    // String / RegExp facets
    // ------------------------------------------------------------------

    /// Inclusive lower bound on string length, in characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_min_length(mut self, min: usize) -> Self {
        match &mut self.kind {
            Kind::String(facets) => facets.min_length = Some(min),
            Kind::RegExp(facets) => facets.min_length = Some(min),
            _ => {}
        }
        self
    }

    /// Inclusive upper bound on string length, in characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_length(mut self, max: usize) -> Self {
        match &mut self.kind {
            Kind::String(facets) => facets.max_length = Some(max),
            Kind::RegExp(facets) => facets.max_length = Some(max),
            _ => {}
        }
        self
    }

    /// Regular expression the string must match.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_pattern(mut self, pattern: impl Into<LazyPattern>) -> Self {
        if let Kind::String(facets) = &mut self.kind {
            facets.pattern = Some(pattern.into());
        }
        self
    }

    /// Named format, checked through the registry's format predicates.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        if let Kind::String(facets) = &mut self.kind {
            facets.format = Some(format.into());
        }
        self
    }

    /// Content encoding (`base64` is checked natively).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_content_encoding(mut self, encoding: impl Into<String>) -> Self {
        if let Kind::String(facets) = &mut self.kind {
            facets.content_encoding = Some(encoding.into());
        }
        self
    }

    /// Media-type annotation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_content_media_type(mut self, media_type: impl Into<String>) -> Self {
        if let Kind::String(facets) = &mut self.kind {
            facets.content_media_type = Some(media_type.into());
        }
        self
    }

    // ------------------------------------------------------------------
    // Numeric facets (Number / Integer)
    // ------------------------------------------------------------------

    /// Inclusive lower bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_minimum(mut self, min: f64) -> Self {
        if let Kind::Number(facets) | Kind::Integer(facets) = &mut self.kind {
            facets.minimum = Some(min);
        }
        self
    }

    /// Inclusive upper bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_maximum(mut self, max: f64) -> Self {
        if let Kind::Number(facets) | Kind::Integer(facets) = &mut self.kind {
            facets.maximum = Some(max);
        }
        self
    }

    /// Exclusive lower bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exclusive_minimum(mut self, min: f64) -> Self {
        if let Kind::Number(facets) | Kind::Integer(facets) = &mut self.kind {
            facets.exclusive_minimum = Some(min);
        }
        self
    }

    /// Exclusive upper bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exclusive_maximum(mut self, max: f64) -> Self {
        if let Kind::Number(facets) | Kind::Integer(facets) = &mut self.kind {
            facets.exclusive_maximum = Some(max);
        }
        self
    }

    /// Requires the value to be a multiple of `factor`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_multiple_of(mut self, factor: f64) -> Self {
        if let Kind::Number(facets) | Kind::Integer(facets) = &mut self.kind {
            facets.multiple_of = Some(factor);
        }
        self
    }

    // ------------------------------------------------------------------
    // BigInt facets
    // ------------------------------------------------------------------

    /// Inclusive lower bound (BigInt kind).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_minimum_bigint(mut self, min: impl Into<BigInt>) -> Self {
        if let Kind::BigInt(facets) = &mut self.kind {
            facets.minimum = Some(min.into());
        }
        self
    }

    /// Inclusive upper bound (BigInt kind).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_maximum_bigint(mut self, max: impl Into<BigInt>) -> Self {
        if let Kind::BigInt(facets) = &mut self.kind {
            facets.maximum = Some(max.into());
        }
        self
    }

    /// Exclusive lower bound (BigInt kind).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exclusive_minimum_bigint(mut self, min: impl Into<BigInt>) -> Self {
        if let Kind::BigInt(facets) = &mut self.kind {
            facets.exclusive_minimum = Some(min.into());
        }
        self
    }

    /// Exclusive upper bound (BigInt kind).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exclusive_maximum_bigint(mut self, max: impl Into<BigInt>) -> Self {
        if let Kind::BigInt(facets) = &mut self.kind {
            facets.exclusive_maximum = Some(max.into());
        }
        self
    }

    /// Exact-division multiple check (BigInt kind).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_multiple_of_bigint(mut self, factor: impl Into<BigInt>) -> Self {
        if let Kind::BigInt(facets) = &mut self.kind {
            facets.multiple_of = Some(factor.into());
        }
        self
    }

    // ------------------------------------------------------------------
    // Date facets (epoch milliseconds)
    // ------------------------------------------------------------------

    /// Inclusive lower bound on the timestamp.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_minimum_timestamp(mut self, min: i64) -> Self {
        if let Kind::Date(facets) = &mut self.kind {
            facets.minimum_timestamp = Some(min);
        }
        self
    }

    /// Inclusive upper bound on the timestamp.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_maximum_timestamp(mut self, max: i64) -> Self {
        if let Kind::Date(facets) = &mut self.kind {
            facets.maximum_timestamp = Some(max);
        }
        self
    }

    /// Exclusive lower bound on the timestamp.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exclusive_minimum_timestamp(mut self, min: i64) -> Self {
        if let Kind::Date(facets) = &mut self.kind {
            facets.exclusive_minimum_timestamp = Some(min);
        }
        self
    }

    /// Exclusive upper bound on the timestamp.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exclusive_maximum_timestamp(mut self, max: i64) -> Self {
        if let Kind::Date(facets) = &mut self.kind {
            facets.exclusive_maximum_timestamp = Some(max);
        }
        self
    }

    /// Requires the timestamp to be a multiple of `factor` milliseconds.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_multiple_of_timestamp(mut self, factor: i64) -> Self {
        if let Kind::Date(facets) = &mut self.kind {
            facets.multiple_of_timestamp = Some(factor);
        }
        self
    }

    // ------------------------------------------------------------------
    // Array / Tuple facets
    // ------------------------------------------------------------------

    /// Inclusive lower bound on element count.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_min_items(mut self, min: usize) -> Self {
        match &mut self.kind {
            Kind::Array(facets) => facets.min_items = Some(min),
            Kind::Tuple(facets) => facets.min_items = min,
            _ => {}
        }
        self
    }

    /// Inclusive upper bound on element count.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_items(mut self, max: usize) -> Self {
        match &mut self.kind {
            Kind::Array(facets) => facets.max_items = Some(max),
            Kind::Tuple(facets) => facets.max_items = max,
            _ => {}
        }
        self
    }

    /// Rejects structurally equal elements when `true`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_unique_items(mut self, unique: bool) -> Self {
        if let Kind::Array(facets) = &mut self.kind {
            facets.unique_items = Some(unique);
        }
        self
    }

    /// Counts elements matching `contains` for the contains bounds.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_contains(mut self, contains: Schema) -> Self {
        if let Kind::Array(facets) = &mut self.kind {
            facets.contains = Some(Box::new(contains));
        }
        self
    }

    /// Lower bound on the contains count.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_min_contains(mut self, min: usize) -> Self {
        if let Kind::Array(facets) = &mut self.kind {
            facets.min_contains = Some(min);
        }
        self
    }

    /// Upper bound on the contains count.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_contains(mut self, max: usize) -> Self {
        if let Kind::Array(facets) = &mut self.kind {
            facets.max_contains = Some(max);
        }
        self
    }

    /// Governs tuple positions beyond the declared items.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_additional_items(mut self, allowed: bool) -> Self {
        if let Kind::Tuple(facets) = &mut self.kind {
            facets.additional_items = Some(allowed);
        }
        self
    }

    // ------------------------------------------------------------------
    // Object / Record / Intersect facets
    // ------------------------------------------------------------------

    /// Property names that must be present.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_required<K: Into<String>>(
        mut self,
        required: impl IntoIterator<Item = K>,
    ) -> Self {
        if let Kind::Object(facets) = &mut self.kind {
            facets.required = Some(required.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Governs keys outside the declared properties or patterns.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_additional_properties(
        mut self,
        additional: impl Into<AdditionalProperties>,
    ) -> Self {
        match &mut self.kind {
            Kind::Object(facets) => facets.additional_properties = Some(additional.into()),
            Kind::Record(facets) => facets.additional_properties = Some(additional.into()),
            _ => {}
        }
        self
    }

    /// Inclusive lower bound on key count.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_min_properties(mut self, min: usize) -> Self {
        if let Kind::Object(facets) = &mut self.kind {
            facets.min_properties = Some(min);
        }
        self
    }

    /// Inclusive upper bound on key count.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_properties(mut self, max: usize) -> Self {
        if let Kind::Object(facets) = &mut self.kind {
            facets.max_properties = Some(max);
        }
        self
    }

    /// Governs object keys claimed by no intersection branch.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_unevaluated_properties(
        mut self,
        unevaluated: impl Into<AdditionalProperties>,
    ) -> Self {
        if let Kind::Intersect(facets) = &mut self.kind {
            facets.unevaluated_properties = Some(unevaluated.into());
        }
        self
    }

    // ------------------------------------------------------------------
    // Uint8Array facets
    // ------------------------------------------------------------------

    /// Inclusive lower bound on byte length.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_min_byte_length(mut self, min: usize) -> Self {
        if let Kind::Uint8Array(facets) = &mut self.kind {
            facets.min_byte_length = Some(min);
        }
        self
    }

    /// Inclusive upper bound on byte length.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_byte_length(mut self, max: usize) -> Self {
        if let Kind::Uint8Array(facets) = &mut self.kind {
            facets.max_byte_length = Some(max);
        }
        self
    }

    // ------------------------------------------------------------------
    // Conveniences
    // ------------------------------------------------------------------

    /// Validates `value` against this node. See [`crate::validate`].
    #[must_use]
    pub fn validate(&self, registry: &Registry, value: &Value) -> Vec<ValueError> {
        crate::validate::validate(self, registry, value)
    }

    /// True when `value` satisfies this node.
    #[must_use]
    pub fn is_valid(&self, registry: &Registry, value: &Value) -> bool {
        crate::validate::is_valid(self, registry, value)
    }

    /// Best-effort conversion of `value` toward this node's shape.
    /// See [`crate::convert`].
    #[must_use]
    pub fn convert(&self, registry: &Registry, value: &Value) -> Value {
        crate::convert::convert(self, registry, value)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::schema::build;
    use crate::schema::kind::Kind;

    #[test]
    fn facet_setter_applies_to_matching_kind() {
        let schema = build::string().with_min_length(2);
        let Kind::String(facets) = &schema.kind else {
            panic!("expected string kind");
        };
        assert_eq!(facets.min_length, Some(2));
    }

    #[test]
    fn facet_setter_is_inert_on_other_kinds() {
        let schema = build::boolean().with_min_length(2);
        assert_eq!(schema, build::boolean());
    }

    #[test]
    fn annotations_chain() {
        let schema = build::number()
            .with_id("Price")
            .with_title("Price")
            .with_description("Unit price in cents");
        assert_eq!(schema.id(), Some("Price"));
        assert_eq!(schema.options.title.as_deref(), Some("Price"));
    }

    #[test]
    fn min_items_applies_to_arrays_and_tuples() {
        let array = build::array(build::number()).with_min_items(1);
        let Kind::Array(facets) = &array.kind else {
            panic!("expected array kind");
        };
        assert_eq!(facets.min_items, Some(1));

        let tuple = build::tuple([build::number()]).with_min_items(0);
        let Kind::Tuple(facets) = &tuple.kind else {
            panic!("expected tuple kind");
        };
        assert_eq!(facets.min_items, 0);
    }
}
