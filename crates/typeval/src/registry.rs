//! The schema registry: identifier → schema, plus the pluggable format and
//! custom-kind predicates.
//!
//! A registry is built once, before validation begins, and treated as
//! immutable afterwards — every hot path takes `&Registry`, so concurrent
//! callers can validate different values against the same schema/registry
//! pair without coordination.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::schema::Schema;
use crate::value::Value;

/// Predicate deciding whether a string satisfies a named format.
pub type FormatCheck = dyn Fn(&str) -> bool + Send + Sync;

/// Predicate deciding whether a value satisfies a custom-kinded schema.
pub type KindCheck = dyn Fn(&Schema, &Value) -> bool + Send + Sync;

// ============================================================================
// ERRORS
// ============================================================================

/// Registration failures. These are configuration defects, reported through
/// `Result` — unlike validation failures, which are data.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// [`Registry::register`] needs the node to carry an `$id`.
    #[error("schema has no $id to register under")]
    MissingId,

    /// The identifier is already taken.
    #[error("duplicate schema identifier `{0}`")]
    DuplicateId(String),
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Mapping from schema identifier to schema node, used to resolve `Ref` and
/// `This` nodes — including the self-references that make recursive schemas
/// expressible without cyclic data structures.
///
/// # Examples
///
/// ```
/// use typeval::{build, is_valid, Registry, Value};
/// use serde_json::json;
///
/// let node = build::recursive("Node", |node| {
///     build::object([("next", build::optional(node))])
/// });
///
/// let mut registry = Registry::new();
/// registry.register(node.clone()).unwrap();
/// assert!(is_valid(&node, &registry, &Value::from(json!({ "next": {} }))));
/// ```
#[derive(Default)]
pub struct Registry {
    schemas: IndexMap<String, Schema>,
    formats: HashMap<String, Box<FormatCheck>>,
    kinds: HashMap<String, Box<KindCheck>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its own `$id`.
    ///
    /// Fails if the node carries no `$id` or the identifier is taken.
    pub fn register(&mut self, schema: Schema) -> Result<(), RegistryError> {
        let Some(id) = schema.id().map(str::to_owned) else {
            return Err(RegistryError::MissingId);
        };
        if self.schemas.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        tracing::debug!(id = %id, kind = %schema.kind_name(), "registering schema");
        self.schemas.insert(id, schema);
        Ok(())
    }

    /// Registers a schema under an explicit identifier, replacing any
    /// previous entry. The node's own `$id` is not consulted.
    pub fn insert(&mut self, id: impl Into<String>, schema: Schema) {
        let id = id.into();
        tracing::debug!(id = %id, kind = %schema.kind_name(), "inserting schema");
        self.schemas.insert(id, schema);
    }

    /// Registers a format predicate consulted by the String `format` facet.
    pub fn register_format(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) {
        self.formats.insert(name.into(), Box::new(check));
    }

    /// Registers a validation hook for a custom schema kind. Custom kinds
    /// without a hook reject every value.
    pub fn register_kind(
        &mut self,
        kind: impl Into<String>,
        check: impl Fn(&Schema, &Value) -> bool + Send + Sync + 'static,
    ) {
        self.kinds.insert(kind.into(), Box::new(check));
    }

    /// Looks up a schema by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(id)
    }

    /// True when `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Looks up a format predicate by name.
    #[must_use]
    pub fn format(&self, name: &str) -> Option<&FormatCheck> {
        self.formats.get(name).map(Box::as_ref)
    }

    /// Looks up a custom-kind hook by kind string.
    #[must_use]
    pub fn kind_hook(&self, kind: &str) -> Option<&KindCheck> {
        self.kinds.get(kind).map(Box::as_ref)
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True when no schema is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered identifiers, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("schemas", &self.schemas.keys().collect::<Vec<_>>())
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
