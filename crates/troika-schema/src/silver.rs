//! # Silver Value Rewriter
//!
//! Older corpus files encode prices as strings like `"25_silver"`. This
//! module rewrites them to plain integers (`25`) so they satisfy the
//! numeric `value` constraints in the schemas.
//!
//! Only values stored directly under a key named `value` are converted.
//! The rewrite preserves key order and writes 2-space-indented JSON.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::corpus;
use crate::error::SilverError;

fn silver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)_silver$").expect("silver pattern compiles"))
}

/// One rewritten value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilverChange {
    /// Location in `a.b[0].value` notation.
    pub path: String,
    /// Original string.
    pub from: String,
    /// Integer it became.
    pub to: u64,
}

impl fmt::Display for SilverChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}' -> {}", self.path, self.from, self.to)
    }
}

/// The integer a `"<digits>_silver"` string stands for, if `value` is one.
pub fn convert_silver_value(value: &Value) -> Option<Value> {
    let text = value.as_str()?;
    let captures = silver_pattern().captures(text)?;
    captures[1].parse::<u64>().ok().map(Value::from)
}

/// Rewrite every silver string under a `value` key, returning the new
/// tree and the list of changes.
pub fn convert_tree(value: &Value) -> (Value, Vec<SilverChange>) {
    let mut changes = Vec::new();
    let converted = convert_node(value, "", &mut changes);
    (converted, changes)
}

fn convert_node(node: &Value, path: &str, changes: &mut Vec<SilverChange>) -> Value {
    match node {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                let converted = if key == "value" {
                    match (convert_silver_value(value), value.as_str()) {
                        (Some(converted), Some(original)) => {
                            changes.push(SilverChange {
                                path: child_path,
                                from: original.to_string(),
                                to: converted.as_u64().unwrap_or_default(),
                            });
                            converted
                        }
                        _ => value.clone(),
                    }
                } else {
                    convert_node(value, &child_path, changes)
                };
                out.insert(key.clone(), converted);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| convert_node(item, &format!("{path}[{i}]"), changes))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Outcome for one file.
#[derive(Debug, Clone)]
pub struct FileConversion {
    /// The file.
    pub path: PathBuf,
    /// Values rewritten (or that would be, in a dry run).
    pub changes: Vec<SilverChange>,
    /// Whether the file was written back.
    pub written: bool,
}

/// Convert one file in place. Files without silver strings are left
/// untouched, as is every file when `dry_run` is set.
///
/// # Errors
///
/// [`SilverError`] if the file cannot be read, parsed, or written.
pub fn convert_file(path: &Path, dry_run: bool) -> Result<FileConversion, SilverError> {
    let content = std::fs::read_to_string(path).map_err(|source| SilverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|source| SilverError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let (converted, changes) = convert_tree(&document);
    let written = !changes.is_empty() && !dry_run;

    if written {
        let output = serde_json::to_string_pretty(&converted).map_err(|e| SilverError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, output).map_err(|e| SilverError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::info!(file = %path.display(), changes = changes.len(), "rewrote silver values");
    }

    Ok(FileConversion {
        path: path.to_path_buf(),
        changes,
        written,
    })
}

/// Totals for a corpus-wide conversion.
#[derive(Debug, Default)]
pub struct SilverReport {
    /// Number of `*.json` files examined.
    pub files_processed: usize,
    /// Files that contained silver strings.
    pub modified: Vec<FileConversion>,
    /// Files that could not be processed.
    pub failures: Vec<SilverError>,
}

impl SilverReport {
    /// Total number of rewritten values.
    pub fn total_changes(&self) -> usize {
        self.modified.iter().map(|f| f.changes.len()).sum()
    }
}

/// Convert every `*.json` file under `dir`, recursively.
///
/// Per-file failures are collected and logged; they never stop the run.
///
/// # Errors
///
/// Fails only if `dir` cannot be listed.
pub fn convert_corpus(dir: &Path, dry_run: bool) -> std::io::Result<SilverReport> {
    let files = corpus::discover(dir, true)?;
    let mut report = SilverReport {
        files_processed: files.len(),
        ..SilverReport::default()
    };

    for file in &files {
        match convert_file(file, dry_run) {
            Ok(conversion) if !conversion.changes.is_empty() => report.modified.push(conversion),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Error processing {}: {e}", file.display());
                report.failures.push(e);
            }
        }
    }

    Ok(report)
}
