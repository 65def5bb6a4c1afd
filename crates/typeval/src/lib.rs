//! # typeval
//!
//! Schema-driven validation and best-effort coercion for untrusted runtime
//! values.
//!
//! ## Quick Start
//!
//! ```
//! use typeval::prelude::*;
//! use serde_json::json;
//!
//! let user = build::object([
//!     ("name", build::string().with_min_length(1)),
//!     ("age", build::integer().with_minimum(0.0)),
//! ])
//! .with_required(["name"]);
//!
//! let registry = Registry::new();
//! let value = Value::from(json!({ "name": "ada", "age": 36 }));
//! assert!(validate(&user, &registry, &value).is_empty());
//!
//! let errors = validate(&user, &registry, &Value::from(json!({ "age": -1 })));
//! assert_eq!(errors.len(), 2); // missing name, age below minimum
//! ```
//!
//! ## Pieces
//!
//! - [`schema`] — the tagged schema model, its constructors ([`build`]) and
//!   the self-describing [`metaschema`](schema::metaschema).
//! - [`Registry`] — identifier → schema, resolving `Ref`/`This` nodes so
//!   recursive schemas need no cyclic data structures.
//! - [`validate`] — recursive-descent checking; failures are returned as
//!   ordered [`ValueError`] data, never thrown.
//! - [`convert`] — best-effort coercion of raw input toward a schema's
//!   shape, applied optionally before validation.
//!
//! ## Checking schemas themselves
//!
//! Every schema the constructors produce validates against the meta-schema;
//! schemas arriving over the wire should be screened once with
//! [`schema::validate_schema`] before use.

pub mod convert;
pub mod error;
pub mod pointer;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod validate;
pub mod value;

pub use convert::convert;
pub use error::{ErrorKind, ValueError};
pub use registry::{Registry, RegistryError};
pub use schema::{build, Kind, LazyPattern, Options, Schema, SchemaError};
pub use validate::{is_valid, validate, Validator};
pub use value::Value;
