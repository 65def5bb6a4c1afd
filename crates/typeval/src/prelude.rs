//! Prelude module for convenient imports.
//!
//! A single `use typeval::prelude::*;` brings in the schema constructors,
//! the registry, the validation and conversion entry points and the error
//! types.

pub use crate::convert::convert;
pub use crate::error::{ErrorKind, ValueError};
pub use crate::registry::{Registry, RegistryError};
pub use crate::schema::{
    build, is_well_formed, metaschema, validate_schema, Kind, Options, Schema, SchemaError,
};
pub use crate::validate::{is_valid, validate, Validator};
pub use crate::value::Value;
