//! The schema model: tagged nodes, constructors, serialization and the
//! self-describing meta-schema.
//!
//! A schema is a [`Schema`] node — one [`Kind`] from the closed set plus an
//! [`Options`] annotation bag — built through [`build`], serialized to the
//! JSON-Schema-shaped wire form, and checked for structural well-formedness
//! against the [`metaschema`].

pub mod build;
mod kind;
mod meta;
mod node;
mod options;
mod pattern;
mod serde;

pub use kind::{
    AdditionalProperties, ArrayKind, BigIntKind, BytesKind, CustomKind, DateKind, IntersectKind,
    Kind, LiteralValue, MappedKeyKind, MappedResultKind, NumberKind, ObjectKind, RecordKind,
    RegExpKind, SignatureKind, StreamKind, StringKind, TupleKind, UnionKind, KIND_NAMES,
};
pub use meta::{is_well_formed, metaschema, metaschema_registry, validate_schema};
pub use node::Schema;
pub use options::Options;
pub use pattern::LazyPattern;
pub use serde::SchemaError;
