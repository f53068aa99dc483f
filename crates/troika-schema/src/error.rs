//! # Error Types
//!
//! Errors raised by the schema engine. Only [`InitializationError`] is
//! fatal to a run; everything that goes wrong with an individual schema
//! file or target document is recorded and the batch continues.
//!
//! Per-document failures are not errors in the `Result` sense: they are
//! carried inside a failed [`ValidationResult`](crate::ValidationResult)
//! as a [`Violation`](crate::Violation) whose
//! [`ViolationKind`](crate::ViolationKind) names the failure class.

use std::path::PathBuf;

use thiserror::Error;

/// The schema store could not be built. Aborts the run.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// The configured schema directory does not exist.
    #[error("Schema directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The directory exists but holds no `*.schema.json` files.
    #[error("No schema files found in {}", .0.display())]
    NoSchemasFound(PathBuf),

    /// Schema files were present but every one of them failed to load.
    #[error("None of the {count} schema files in {} could be loaded", dir.display())]
    NoUsableSchemas {
        /// Directory that was scanned.
        dir: PathBuf,
        /// Number of matching files that failed.
        count: usize,
    },

    /// An in-memory store was built from zero schemas.
    #[error("schema store is empty")]
    Empty,

    /// The schema directory could not be listed.
    #[error("cannot read schema directory {}: {source}", dir.display())]
    Io {
        /// Directory that was scanned.
        dir: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// A single schema file was skipped during store construction.
#[derive(Error, Debug, Clone)]
#[error("Failed to load schema {}: {reason}", file.display())]
pub struct SchemaLoadWarning {
    /// The schema file that was skipped.
    pub file: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// A compiled validator could not be produced for a schema, even after
/// the degraded-reference fallback.
#[derive(Error, Debug)]
pub enum ValidatorBuildError {
    /// No schema with this identifier is loaded.
    #[error("Schema '{0}' not found")]
    SchemaNotFound(String),

    /// The schema (or its degraded copy) failed to compile.
    #[error("schema '{schema_id}' could not be compiled: {reason}")]
    Compile {
        /// Identifier of the schema.
        schema_id: String,
        /// Compiler error message.
        reason: String,
    },
}

/// Error in the silver-value rewriter.
#[derive(Error, Debug)]
pub enum SilverError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The rewritten document could not be serialized or written back.
    #[error("cannot write {}: {reason}", path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// Reason the write failed.
        reason: String,
    },
}
