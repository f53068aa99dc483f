//! # Degraded Schemas
//!
//! When a schema's `$ref`s cannot be resolved the evaluator refuses to
//! compile it. Rather than failing the document, validation falls back to
//! a degraded copy in which each offending reference node is replaced by
//! the permissive constraint `{"type": "object"}`.
//!
//! Every function here is a pure transform: the input schema is never
//! modified and a new tree is returned, so the store's schemas stay
//! stable across repeated and concurrent validations.

use serde_json::{json, Map, Value};

use crate::store::SchemaStore;

/// Prefix of the bundled JSON Schema meta-schemas.
const META_SCHEMA_PREFIX: &str = "http://json-schema.org/";

/// Keywords whose value maps names to subschemas. A key inside one of
/// these maps is a name, not a keyword, even when it reads `$ref`.
const SCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "$defs",
    "dependencies",
];

/// Keywords whose value is instance data rather than a schema.
const DATA_KEYWORDS: &[&str] = &["const", "default", "enum", "examples"];

/// Whether any schema node in the tree carries a `$ref`.
pub fn contains_ref(schema: &Value) -> bool {
    match schema {
        Value::Object(map) => {
            map.contains_key("$ref")
                || map.iter().any(|(key, value)| {
                    if DATA_KEYWORDS.contains(&key.as_str()) {
                        false
                    } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                        match value {
                            Value::Object(named) => named.values().any(contains_ref),
                            other => contains_ref(other),
                        }
                    } else {
                        contains_ref(value)
                    }
                })
        }
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}

/// Replace every `$ref` node in the tree with `{"type": "object"}`.
pub fn strip_refs(schema: &Value) -> Value {
    replace_refs(schema, &|_| true)
}

/// Replace only the `$ref` nodes that point at nothing.
///
/// A reference is kept when its fragment resolves inside `schema` itself,
/// or when it names a schema in `store` and its fragment resolves there.
pub fn strip_unresolved_refs(schema: &Value, store: &SchemaStore) -> Value {
    replace_refs(schema, &|reference| !is_resolvable(reference, schema, store))
}

fn replace_refs(node: &Value, should_replace: &dyn Fn(&str) -> bool) -> Value {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref") {
                let replace = match reference.as_str() {
                    Some(reference) => should_replace(reference),
                    None => true,
                };
                if replace {
                    return json!({ "type": "object" });
                }
            }
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                let replaced = if DATA_KEYWORDS.contains(&key.as_str()) {
                    value.clone()
                } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                    replace_in_schema_map(value, should_replace)
                } else {
                    replace_refs(value, should_replace)
                };
                out.insert(key.clone(), replaced);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| replace_refs(item, should_replace))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn replace_in_schema_map(node: &Value, should_replace: &dyn Fn(&str) -> bool) -> Value {
    match node {
        Value::Object(named) => Value::Object(
            named
                .iter()
                .map(|(name, subschema)| (name.clone(), replace_refs(subschema, should_replace)))
                .collect(),
        ),
        other => replace_refs(other, should_replace),
    }
}

fn is_resolvable(reference: &str, root: &Value, store: &SchemaStore) -> bool {
    if reference.starts_with(META_SCHEMA_PREFIX) {
        return true;
    }

    let (base, fragment) = reference.split_once('#').unwrap_or((reference, ""));

    if base.is_empty() || root.get("$id").and_then(Value::as_str) == Some(base) {
        return fragment_exists(root, fragment);
    }

    match store.find_by_reference(base) {
        Some(target) => fragment_exists(target.value(), fragment),
        None => false,
    }
}

fn fragment_exists(target: &Value, fragment: &str) -> bool {
    if fragment.is_empty() {
        true
    } else if fragment.starts_with('/') {
        target.pointer(fragment).is_some()
    } else {
        has_anchor(target, fragment)
    }
}

fn has_anchor(node: &Value, name: &str) -> bool {
    match node {
        Value::Object(map) => {
            let anchored = map.get("$anchor").and_then(Value::as_str) == Some(name)
                || map
                    .get("$id")
                    .and_then(Value::as_str)
                    .and_then(|id| id.strip_prefix('#'))
                    == Some(name);
            anchored || map.values().any(|v| has_anchor(v, name))
        }
        Value::Array(items) => items.iter().any(|v| has_anchor(v, name)),
        _ => false,
    }
}
