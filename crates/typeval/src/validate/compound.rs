//! Structural checks: arrays, tuples, objects and records.

use std::collections::HashSet;

use crate::error::ErrorKind;
use crate::pointer;
use crate::schema::{
    AdditionalProperties, ArrayKind, Kind, ObjectKind, RecordKind, Schema, TupleKind,
};
use crate::validate::{fail, Visit};
use crate::value::Value;

impl Visit<'_> {
    pub(super) fn check_array(
        &mut self,
        schema: &Schema,
        facets: &ArrayKind,
        value: &Value,
        path: &mut String,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(items) = value.as_array() else {
            fail(out, ErrorKind::Array, path, "Expected array", schema, value);
            return;
        };

        if let Some(min) = facets.min_items {
            if items.len() < min {
                fail(
                    out,
                    ErrorKind::Array,
                    path,
                    format!("Must have at least {min} items"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.max_items {
            if items.len() > max {
                fail(
                    out,
                    ErrorKind::Array,
                    path,
                    format!("Must have at most {max} items"),
                    schema,
                    value,
                );
            }
        }

        if facets.unique_items == Some(true) {
            let duplicated = items
                .iter()
                .enumerate()
                .any(|(index, item)| items[..index].contains(item));
            if duplicated {
                fail(
                    out,
                    ErrorKind::Array,
                    path,
                    "Expected array items to be unique",
                    schema,
                    value,
                );
            }
        }

        for (index, item) in items.iter().enumerate() {
            let mark = path.len();
            pointer::push_index(path, index);
            self.visit(&facets.items, item, path, out);
            path.truncate(mark);
        }

        if let Some(contains) = &facets.contains {
            let mut matching = 0usize;
            for (index, item) in items.iter().enumerate() {
                let mark = path.len();
                pointer::push_index(path, index);
                let mut scratch = Vec::new();
                self.visit(contains, item, path, &mut scratch);
                path.truncate(mark);
                if scratch.is_empty() {
                    matching += 1;
                }
            }
            let min = facets.min_contains.unwrap_or(1);
            if matching < min {
                fail(
                    out,
                    ErrorKind::Array,
                    path,
                    format!("Must contain at least {min} matching items"),
                    schema,
                    value,
                );
            }
            if let Some(max) = facets.max_contains {
                if matching > max {
                    fail(
                        out,
                        ErrorKind::Array,
                        path,
                        format!("Must contain at most {max} matching items"),
                        schema,
                        value,
                    );
                }
            }
        }
    }

    pub(super) fn check_tuple(
        &mut self,
        schema: &Schema,
        facets: &TupleKind,
        value: &Value,
        path: &mut String,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(items) = value.as_array() else {
            fail(out, ErrorKind::Tuple, path, "Expected tuple", schema, value);
            return;
        };

        if items.len() < facets.min_items {
            fail(
                out,
                ErrorKind::Tuple,
                path,
                format!("Must have at least {} items", facets.min_items),
                schema,
                value,
            );
        }
        if items.len() > facets.max_items {
            fail(
                out,
                ErrorKind::Tuple,
                path,
                format!("Must have at most {} items", facets.max_items),
                schema,
                value,
            );
        }

        for (index, declared) in facets.items.iter().enumerate() {
            let Some(item) = items.get(index) else {
                break;
            };
            let mark = path.len();
            pointer::push_index(path, index);
            self.visit(declared, item, path, out);
            path.truncate(mark);
        }

        if facets.additional_items == Some(false) {
            for index in facets.items.len()..items.len() {
                let mark = path.len();
                pointer::push_index(path, index);
                fail(
                    out,
                    ErrorKind::Tuple,
                    path,
                    "Unexpected tuple item",
                    schema,
                    &items[index],
                );
                path.truncate(mark);
            }
        }
    }

    pub(super) fn check_object(
        &mut self,
        schema: &Schema,
        facets: &ObjectKind,
        value: &Value,
        path: &mut String,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(map) = value.as_object() else {
            fail(out, ErrorKind::Object, path, "Expected object", schema, value);
            return;
        };

        if let Some(min) = facets.min_properties {
            if map.len() < min {
                fail(
                    out,
                    ErrorKind::Object,
                    path,
                    format!("Must have at least {min} properties"),
                    schema,
                    value,
                );
            }
        }
        if let Some(max) = facets.max_properties {
            if map.len() > max {
                fail(
                    out,
                    ErrorKind::Object,
                    path,
                    format!("Must have at most {max} properties"),
                    schema,
                    value,
                );
            }
        }

        if let Some(required) = &facets.required {
            for key in required {
                if !map.contains_key(key) {
                    let mark = path.len();
                    pointer::push_key(path, key);
                    fail(
                        out,
                        ErrorKind::Object,
                        path,
                        "Missing required property",
                        schema,
                        value,
                    );
                    path.truncate(mark);
                }
            }
        }

        for (key, declared) in &facets.properties {
            let Some(child) = map.get(key) else {
                continue;
            };
            let mark = path.len();
            pointer::push_key(path, key);
            self.visit(declared, child, path, out);
            path.truncate(mark);
        }

        if let Some(gate) = &facets.additional_properties {
            for (key, child) in map {
                if facets.properties.contains_key(key) {
                    continue;
                }
                let mark = path.len();
                pointer::push_key(path, key);
                match gate {
                    AdditionalProperties::Allowed(true) => {}
                    AdditionalProperties::Allowed(false) => fail(
                        out,
                        ErrorKind::Object,
                        path,
                        "Unexpected property",
                        schema,
                        child,
                    ),
                    AdditionalProperties::Schema(additional) => {
                        self.visit(additional, child, path, out);
                    }
                }
                path.truncate(mark);
            }
        }
    }

    pub(super) fn check_record(
        &mut self,
        schema: &Schema,
        facets: &RecordKind,
        value: &Value,
        path: &mut String,
        out: &mut Vec<crate::error::ValueError>,
    ) {
        let Some(map) = value.as_object() else {
            fail(out, ErrorKind::Record, path, "Expected object", schema, value);
            return;
        };

        // An uncompilable key pattern is reported once, then treated as
        // matching nothing.
        for (pattern, _) in &facets.pattern_properties {
            if pattern.regex().is_none() {
                fail(
                    out,
                    ErrorKind::Record,
                    path,
                    format!(
                        "Pattern `{}` is not a valid regular expression",
                        pattern.source()
                    ),
                    schema,
                    value,
                );
            }
        }

        'keys: for (key, child) in map {
            for (pattern, declared) in &facets.pattern_properties {
                if pattern.is_match(key) == Some(true) {
                    let mark = path.len();
                    pointer::push_key(path, key);
                    self.visit(declared, child, path, out);
                    path.truncate(mark);
                    continue 'keys;
                }
            }
            let Some(gate) = &facets.additional_properties else {
                continue;
            };
            let mark = path.len();
            pointer::push_key(path, key);
            match gate {
                AdditionalProperties::Allowed(true) => {}
                AdditionalProperties::Allowed(false) => fail(
                    out,
                    ErrorKind::Record,
                    path,
                    "Unexpected property",
                    schema,
                    child,
                ),
                AdditionalProperties::Schema(additional) => {
                    self.visit(additional, child, path, out);
                }
            }
            path.truncate(mark);
        }
    }

    /// Property names declared by any of the given intersection branches,
    /// looking through nested composites and references.
    pub(super) fn claimed_keys(&self, branches: &[Schema]) -> HashSet<String> {
        let mut keys = HashSet::new();
        let mut seen_refs = Vec::new();
        for branch in branches {
            self.collect_claimed(branch, &mut seen_refs, &mut keys);
        }
        keys
    }

    fn collect_claimed(
        &self,
        schema: &Schema,
        seen_refs: &mut Vec<String>,
        keys: &mut HashSet<String>,
    ) {
        match &schema.kind {
            Kind::Object(facets) => keys.extend(facets.properties.keys().cloned()),
            Kind::Intersect(facets) => {
                for branch in &facets.all_of {
                    self.collect_claimed(branch, seen_refs, keys);
                }
            }
            Kind::Union(facets) => {
                for branch in &facets.any_of {
                    self.collect_claimed(branch, seen_refs, keys);
                }
            }
            Kind::Ref(target) | Kind::This(target) => {
                if !seen_refs.iter().any(|seen| seen == target) {
                    seen_refs.push(target.clone());
                    if let Some(resolved) = self.registry.get(target) {
                        self.collect_claimed(resolved, seen_refs, keys);
                    }
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
