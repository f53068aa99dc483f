//! # troika-cli: Command-Line Interface
//!
//! Provides the `troika` binary over the [`troika_schema`] engine.
//!
//! ## Subcommands
//!
//! - `troika validate`: validate a file, a directory, or the whole
//!   objects directory category by category; `--list-schemas` prints the
//!   loaded schemas.
//! - `troika convert-silver`: rewrite `"<n>_silver"` values to integers.
//!
//! ## Crate Policy
//!
//! - Argument parsing and rendering live here; validation logic lives in
//!   `troika-schema`.
//! - Handlers return `anyhow::Result<u8>`; the `u8` is the process exit
//!   code.

pub mod config;
pub mod render;
pub mod silver;
pub mod validate;
