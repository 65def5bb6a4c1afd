//! Shared schema annotations.

use serde_json::{Map, Value as JsonValue};

/// The annotation bag every schema node carries regardless of kind:
/// identification, documentation, defaults and arbitrary extension fields.
/// Annotations never influence validation; they travel with the node
/// through serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
    /// Identifier this node can be registered under (`$id`).
    pub id: Option<String>,
    /// Dialect marker (`$schema`).
    pub dialect: Option<String>,
    /// Short human-readable title.
    pub title: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Default value for this schema.
    pub default: Option<JsonValue>,
    /// Example values matching this schema.
    pub examples: Option<JsonValue>,
    /// Read-only annotation.
    pub read_only: Option<bool>,
    /// Write-only annotation.
    pub write_only: Option<bool>,
    /// Arbitrary extension fields, carried verbatim.
    pub extra: Map<String, JsonValue>,
}

impl Options {
    /// True when no annotation is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.dialect.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.default.is_none()
            && self.examples.is_none()
            && self.read_only.is_none()
            && self.write_only.is_none()
            && self.extra.is_empty()
    }
}
