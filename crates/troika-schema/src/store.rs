//! # Schema Store
//!
//! Loads every `*.schema.json` file in a directory (non-recursively) and
//! indexes the parsed schemas by identifier.
//!
//! ## Identity
//!
//! A schema's identifier is its `$id` string when it declares one, and
//! otherwise the filename with the `.schema.json` suffix stripped
//! (`item.schema.json` → `item`).
//!
//! ## Load Policy
//!
//! - A file that cannot be read or parsed is skipped with a warning.
//! - Files are visited in sorted filename order. When two files produce
//!   the same identifier the later one replaces the earlier one and a
//!   warning names both.
//! - A store with zero schemas is an [`InitializationError`].
//! - Each loaded schema is logged at `info`; skipped files and replaced
//!   duplicates at `warn`.
//!
//! The store is immutable once built. Schemas sit behind an `Arc` so
//! compiled validators can resolve cross-schema `$ref`s against the same
//! snapshot without copying it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{InitializationError, SchemaLoadWarning};

/// Filename suffix identifying schema documents.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// A loaded schema and its identity.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    id: String,
    source: Option<PathBuf>,
    value: Value,
}

impl SchemaDocument {
    /// Identifier the schema is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// File the schema was loaded from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The parsed schema.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Top-level `title`, if the schema declares one.
    pub fn title(&self) -> Option<&str> {
        self.value.get("title").and_then(Value::as_str)
    }

    /// Top-level `description`, if the schema declares one.
    pub fn description(&self) -> Option<&str> {
        self.value.get("description").and_then(Value::as_str)
    }
}

/// Immutable mapping from schema identifier to schema document.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    schema_dir: Option<PathBuf>,
    schemas: Arc<BTreeMap<String, SchemaDocument>>,
    warnings: Vec<SchemaLoadWarning>,
}

impl SchemaStore {
    /// Load all schemas from `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] if the directory is missing or
    /// unreadable, holds no `*.schema.json` files, or none of those files
    /// could be loaded. Individual bad files only produce a
    /// [`SchemaLoadWarning`], available from [`SchemaStore::warnings`].
    pub fn load(schema_dir: impl AsRef<Path>) -> Result<Self, InitializationError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        if !schema_dir.is_dir() {
            return Err(InitializationError::DirectoryNotFound(schema_dir));
        }

        let entries =
            std::fs::read_dir(&schema_dir).map_err(|source| InitializationError::Io {
                dir: schema_dir.clone(),
                source,
            })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_schema_suffix(path))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(InitializationError::NoSchemasFound(schema_dir));
        }

        let mut schemas: BTreeMap<String, SchemaDocument> = BTreeMap::new();
        let mut warnings = Vec::new();

        for file in &files {
            let document = match load_schema_file(file) {
                Ok(document) => document,
                Err(reason) => {
                    let warning = SchemaLoadWarning {
                        file: file.clone(),
                        reason,
                    };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                    continue;
                }
            };

            tracing::info!(
                schema_id = %document.id,
                file = %file.display(),
                "Loaded schema: {}",
                document.id
            );

            let id = document.id.clone();
            if let Some(replaced) = schemas.insert(id.clone(), document) {
                let replaced_file = replaced
                    .source
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                tracing::warn!(
                    schema_id = %id,
                    replaced = %replaced_file,
                    by = %file.display(),
                    "duplicate schema identifier; later file wins"
                );
            }
        }

        if schemas.is_empty() {
            return Err(InitializationError::NoUsableSchemas {
                dir: schema_dir,
                count: files.len(),
            });
        }

        Ok(Self {
            schema_dir: Some(schema_dir),
            schemas: Arc::new(schemas),
            warnings,
        })
    }

    /// Build a store from in-memory `(identifier, schema)` pairs.
    ///
    /// Duplicate identifiers follow the same last-wins rule as
    /// [`SchemaStore::load`].
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::Empty`] if no schemas are given.
    pub fn from_schemas<I, S>(schemas: I) -> Result<Self, InitializationError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let schemas: BTreeMap<String, SchemaDocument> = schemas
            .into_iter()
            .map(|(id, value)| {
                let id = id.into();
                (
                    id.clone(),
                    SchemaDocument {
                        id,
                        source: None,
                        value,
                    },
                )
            })
            .collect();

        if schemas.is_empty() {
            return Err(InitializationError::Empty);
        }

        Ok(Self {
            schema_dir: None,
            schemas: Arc::new(schemas),
            warnings: Vec::new(),
        })
    }

    /// Directory the store was loaded from (`None` for in-memory stores).
    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Number of loaded schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if no schemas are loaded.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Look up a schema by identifier.
    pub fn get(&self, id: &str) -> Option<&SchemaDocument> {
        self.schemas.get(id)
    }

    /// Whether a schema with this identifier is loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// All identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Iterate over schemas in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.schemas.values()
    }

    /// Files skipped during [`SchemaStore::load`].
    pub fn warnings(&self) -> &[SchemaLoadWarning] {
        &self.warnings
    }

    /// Find the schema a `$ref` target points at.
    ///
    /// The fragment is ignored. Matching tries, in order: the exact
    /// identifier, the last path segment of the reference, the source
    /// filename, and the last segment with `.schema.json` or `.json`
    /// stripped.
    pub fn find_by_reference(&self, reference: &str) -> Option<&SchemaDocument> {
        find_in(&self.schemas, reference)
    }

    pub(crate) fn shared(&self) -> Arc<BTreeMap<String, SchemaDocument>> {
        Arc::clone(&self.schemas)
    }
}

pub(crate) fn find_in<'a>(
    schemas: &'a BTreeMap<String, SchemaDocument>,
    reference: &str,
) -> Option<&'a SchemaDocument> {
    let base = reference.split('#').next().unwrap_or_default();
    if base.is_empty() {
        return None;
    }
    if let Some(document) = schemas.get(base) {
        return Some(document);
    }

    let segment = base.rsplit('/').next().unwrap_or(base);
    if segment.is_empty() {
        return None;
    }
    if let Some(document) = schemas.get(segment) {
        return Some(document);
    }

    if let Some(document) = schemas.values().find(|doc| {
        doc.source
            .as_deref()
            .and_then(Path::file_name)
            .is_some_and(|name| name == segment)
    }) {
        return Some(document);
    }

    let stem = segment
        .strip_suffix(SCHEMA_SUFFIX)
        .or_else(|| segment.strip_suffix(".json"))?;
    schemas.get(stem)
}

fn has_schema_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(SCHEMA_SUFFIX))
}

fn load_schema_file(path: &Path) -> Result<SchemaDocument, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))?;

    let id = match value.get("$id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(SCHEMA_SUFFIX))
            .map(str::to_string)
            .ok_or_else(|| "cannot derive schema identifier from filename".to_string())?,
    };

    Ok(SchemaDocument {
        id,
        source: Some(path.to_path_buf()),
        value,
    })
}
