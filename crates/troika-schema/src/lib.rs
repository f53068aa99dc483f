//! # troika-schema: Schema Resolution & Validation
//!
//! Validates the Troika game-data corpus (backgrounds, enemies, items,
//! skills, spells, tables, characters) against the JSON schemas in the
//! `systems/` directory.
//!
//! ## Flow
//!
//! 1. [`SchemaStore::load`] reads every `*.schema.json` once at startup.
//! 2. [`resolve()`] picks a schema identifier from a document's path.
//! 3. [`SchemaValidator`] compiles the schema (Draft 7) and collects every
//!    violation, falling back to a [`degrade`]d schema when `$ref`s
//!    cannot be resolved.
//! 4. [`summarize`] turns a batch of [`ValidationResult`]s into counts.
//!
//! The [`silver`] module holds the corpus rewriter that turns
//! `"<n>_silver"` strings into integers.
//!
//! ## Crate Policy
//!
//! - The store is built once and passed explicitly; there is no global
//!   registry.
//! - Per-document problems are reported inside a [`ValidationResult`],
//!   never as a panic or an early exit. Only [`InitializationError`] is
//!   fatal.
//! - No network access: unknown `$ref`s are never fetched.

pub mod corpus;
pub mod degrade;
pub mod error;
pub mod report;
pub mod resolve;
pub mod silver;
pub mod store;
pub mod validate;

pub use error::{InitializationError, SchemaLoadWarning, SilverError, ValidatorBuildError};
pub use report::{summarize, CategoryRun, Summary};
pub use resolve::{resolve, CATEGORY_MAPPING, DEFAULT_SCHEMA_ID};
pub use store::{SchemaDocument, SchemaStore, SCHEMA_SUFFIX};
pub use validate::{
    CompiledSchema, PathSegment, SchemaValidator, ValidationResult, Violation, ViolationKind,
    SYSTEM_DATA_FILE,
};
