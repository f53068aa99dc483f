//! # Structural Validation
//!
//! Runs JSON documents against schemas from a [`SchemaStore`] using the
//! `jsonschema` crate (Draft 7).
//!
//! ## Reference Resolution
//!
//! Cross-schema `$ref`s are resolved by a local retriever backed by the
//! store: the reference is matched against schema identifiers, the last
//! URI path segment, and source filenames. Nothing is ever fetched over
//! the network; an unknown reference makes compilation fail.
//!
//! ## Degraded Fallback
//!
//! A schema that fails to compile while containing `$ref`s is retried
//! against a degraded copy (see [`crate::degrade`]): first with only the
//! unresolvable references replaced, then with every reference replaced.
//! The degraded copy is built per call and never stored. If even that
//! fails, the document gets a single [`ViolationKind::Evaluation`] error.
//!
//! ## Error Reporting
//!
//! Every violation is collected, not just the first. Instance paths are
//! reported as property names and array indices from the document root.
//! Ordering follows the evaluator's traversal, which is deterministic for
//! a given (document, schema, store).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde::Serialize;
use serde_json::Value;

use crate::corpus;
use crate::degrade;
use crate::error::ValidatorBuildError;
use crate::report::CategoryRun;
use crate::resolve::{self, CATEGORY_MAPPING};
use crate::store::{self, SchemaDocument, SchemaStore};

/// Whole-system data file validated at the end of a category run.
pub const SYSTEM_DATA_FILE: &str = "troika-system-data.json";

/// Retriever that resolves `$ref` URIs against the loaded store.
struct StoreRetriever {
    schemas: Arc<BTreeMap<String, SchemaDocument>>,
}

impl Retrieve for StoreRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        match store::find_in(&self.schemas, uri_str) {
            Some(document) => Ok(document.value().clone()),
            None => Err(format!("unresolvable reference '{uri_str}'").into()),
        }
    }
}

/// One step in the path from the document root to an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object property name.
    Property(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Failure class of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The document breaks a schema constraint.
    Constraint,
    /// No schema was determined, or the identifier is not in the store.
    SchemaNotFound,
    /// The document file could not be read.
    DocumentRead,
    /// The document is not well-formed JSON.
    DocumentParse,
    /// The schema could not be evaluated, even in degraded form.
    Evaluation,
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Failure class.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
    /// Location of the offending value; empty for the document root.
    pub path: Vec<PathSegment>,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// The path joined with `.`, e.g. `skills.0.name`.
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} at {}", self.message, self.dotted_path())
        }
    }
}

/// Outcome of validating one document.
///
/// `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Where the document came from.
    pub source: PathBuf,
    /// Whether the document passed.
    pub valid: bool,
    /// Identifier of the schema actually used, if one was found.
    pub schema_used: Option<String>,
    /// Errors in evaluator order.
    pub errors: Vec<Violation>,
}

impl ValidationResult {
    fn from_errors(source: &Path, schema_used: Option<String>, errors: Vec<Violation>) -> Self {
        Self {
            source: source.to_path_buf(),
            valid: errors.is_empty(),
            schema_used,
            errors,
        }
    }

    fn failed(source: &Path, schema_used: Option<String>, violation: Violation) -> Self {
        Self::from_errors(source, schema_used, vec![violation])
    }

    /// File name of the source, for display.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// A compiled schema, possibly built from the degraded fallback.
pub struct CompiledSchema {
    validator: Validator,
    degraded: bool,
}

impl CompiledSchema {
    /// Whether unresolved references forced the degraded fallback.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Collect every violation of `document`.
    pub fn violations(&self, document: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(document)
            .map(|e| Violation {
                kind: ViolationKind::Constraint,
                path: pointer_to_path(document, &e.instance_path.to_string()),
                message: e.to_string(),
            })
            .collect()
    }
}

/// Validates documents against a borrowed [`SchemaStore`].
///
/// The store is only read, so a validator is cheap to create and any
/// number of them can share one store.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'s> {
    store: &'s SchemaStore,
}

impl<'s> SchemaValidator<'s> {
    /// Create a validator over `store`.
    pub fn new(store: &'s SchemaStore) -> Self {
        Self { store }
    }

    /// The store this validator reads from.
    pub fn store(&self) -> &'s SchemaStore {
        self.store
    }

    /// Compile the schema registered as `schema_id`, falling back to a
    /// degraded copy when its references cannot be resolved.
    ///
    /// # Errors
    ///
    /// [`ValidatorBuildError::SchemaNotFound`] if the identifier is not
    /// loaded; [`ValidatorBuildError::Compile`] if neither the schema nor
    /// its degraded forms compile.
    pub fn build_validator(&self, schema_id: &str) -> Result<CompiledSchema, ValidatorBuildError> {
        let schema = self
            .store
            .get(schema_id)
            .ok_or_else(|| ValidatorBuildError::SchemaNotFound(schema_id.to_string()))?
            .value();

        let reason = match self.compile(schema) {
            Ok(validator) => {
                return Ok(CompiledSchema {
                    validator,
                    degraded: false,
                })
            }
            Err(reason) => reason,
        };

        if !degrade::contains_ref(schema) {
            return Err(ValidatorBuildError::Compile {
                schema_id: schema_id.to_string(),
                reason,
            });
        }

        tracing::debug!(
            schema_id,
            %reason,
            "schema did not compile; retrying with unresolved references replaced"
        );

        let partial = degrade::strip_unresolved_refs(schema, self.store);
        let validator = match self.compile(&partial) {
            Ok(validator) => validator,
            Err(reason) => {
                tracing::debug!(
                    schema_id,
                    %reason,
                    "partially degraded schema did not compile; replacing every reference"
                );
                self.compile(&degrade::strip_refs(schema))
                    .map_err(|reason| ValidatorBuildError::Compile {
                        schema_id: schema_id.to_string(),
                        reason,
                    })?
            }
        };

        Ok(CompiledSchema {
            validator,
            degraded: true,
        })
    }

    fn compile(&self, schema: &Value) -> Result<Validator, String> {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft7);
        opts.with_retriever(StoreRetriever {
            schemas: self.store.shared(),
        });
        opts.build(schema).map_err(|e| e.to_string())
    }

    /// Validate an already-parsed document against `schema_id`.
    ///
    /// `source` is only recorded in the result.
    pub fn validate_document(
        &self,
        source: &Path,
        document: &Value,
        schema_id: Option<&str>,
    ) -> ValidationResult {
        let Some(schema_id) = schema_id.filter(|id| self.store.contains(id)) else {
            let message = match schema_id {
                Some(id) => format!("Schema '{id}' not found"),
                None => "No schema could be determined".to_string(),
            };
            return ValidationResult::failed(
                source,
                None,
                Violation::new(ViolationKind::SchemaNotFound, message),
            );
        };

        let compiled = match self.build_validator(schema_id) {
            Ok(compiled) => compiled,
            Err(e) => {
                tracing::warn!(source = %source.display(), schema_id, "{e}");
                return ValidationResult::failed(
                    source,
                    Some(schema_id.to_string()),
                    Violation::new(
                        ViolationKind::Evaluation,
                        format!("Validation error: {e}"),
                    ),
                );
            }
        };

        if compiled.is_degraded() {
            tracing::debug!(
                source = %source.display(),
                schema_id,
                "validated against degraded schema"
            );
        }

        let errors = compiled.violations(document);
        tracing::debug!(
            source = %source.display(),
            schema_id,
            errors = errors.len(),
            "validated document"
        );
        ValidationResult::from_errors(source, Some(schema_id.to_string()), errors)
    }

    /// Read, parse, and validate the JSON file at `path`.
    ///
    /// When `schema_id` is `None` the schema is chosen by
    /// [`resolve::resolve`].
    pub fn validate_file(&self, path: &Path, schema_id: Option<&str>) -> ValidationResult {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return ValidationResult::failed(
                    path,
                    None,
                    Violation::new(ViolationKind::DocumentRead, format!("Cannot read file: {e}")),
                )
            }
        };

        let document: Value = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                return ValidationResult::failed(
                    path,
                    None,
                    Violation::new(ViolationKind::DocumentParse, format!("Invalid JSON: {e}")),
                )
            }
        };

        let schema_id = schema_id.unwrap_or_else(|| resolve::resolve(path));
        self.validate_document(path, &document, Some(schema_id))
    }

    /// Validate every `*.json` file in `dir`.
    ///
    /// Each file uses `schema_id` if given, otherwise its resolved schema.
    /// A missing or empty directory yields no results.
    pub fn validate_directory(
        &self,
        dir: &Path,
        recursive: bool,
        schema_id: Option<&str>,
    ) -> Vec<ValidationResult> {
        if !dir.is_dir() {
            tracing::warn!("Directory not found: {}", dir.display());
            return Vec::new();
        }

        let files = match corpus::discover(dir, recursive) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("cannot list {}: {e}", dir.display());
                return Vec::new();
            }
        };

        if files.is_empty() {
            tracing::warn!("No JSON files found in {}", dir.display());
        }

        files
            .iter()
            .map(|file| self.validate_file(file, schema_id))
            .collect()
    }

    /// Validate `objects_dir` one category directory at a time, then the
    /// whole-system data file if present.
    ///
    /// Category directories are visited in mapping order, non-recursively.
    /// Missing ones are skipped with a warning.
    pub fn validate_by_categories(&self, objects_dir: &Path) -> Vec<CategoryRun> {
        let mut runs = Vec::new();

        for (category, _) in CATEGORY_MAPPING {
            let category_dir = objects_dir.join(category);
            if !category_dir.is_dir() {
                tracing::warn!("Category directory not found: {category}");
                continue;
            }
            tracing::info!("Validating {category}...");
            runs.push(CategoryRun {
                label: (*category).to_string(),
                results: self.validate_directory(&category_dir, false, None),
            });
        }

        let system_file = objects_dir.join(SYSTEM_DATA_FILE);
        if system_file.is_file() {
            tracing::info!("Validating main data file...");
            runs.push(CategoryRun {
                label: SYSTEM_DATA_FILE.to_string(),
                results: vec![self.validate_file(&system_file, None)],
            });
        }

        runs
    }
}

/// Convert a JSON Pointer into path segments, using the document to tell
/// array indices from numeric-looking property names.
fn pointer_to_path(document: &Value, pointer: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut current = Some(document);

    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        let segment = match current {
            Some(Value::Array(items)) => match token.parse::<usize>() {
                Ok(index) => {
                    current = items.get(index);
                    PathSegment::Index(index)
                }
                Err(_) => {
                    current = None;
                    PathSegment::Property(token)
                }
            },
            Some(Value::Object(map)) => {
                current = map.get(&token);
                PathSegment::Property(token)
            }
            _ => {
                current = None;
                PathSegment::Property(token)
            }
        };
        segments.push(segment);
    }

    segments
}
