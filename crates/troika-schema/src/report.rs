//! # Result Aggregation
//!
//! Order-independent summaries over [`ValidationResult`]s. Nothing here
//! renders or truncates; presentation is the caller's concern.

use serde::Serialize;

use crate::validate::ValidationResult;

/// Pass/fail counts for a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of documents.
    pub total: usize,
    /// Documents that passed.
    pub valid: usize,
    /// Documents that failed.
    pub invalid: usize,
}

impl Summary {
    /// True when no document failed (including the empty batch).
    pub fn all_valid(&self) -> bool {
        self.invalid == 0
    }
}

/// Count valid and invalid results.
pub fn summarize(results: &[ValidationResult]) -> Summary {
    let valid = results.iter().filter(|r| r.valid).count();
    Summary {
        total: results.len(),
        valid,
        invalid: results.len() - valid,
    }
}

/// Results for one category directory (or the system data file).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRun {
    /// Category name, or the data file name.
    pub label: String,
    /// Per-document results.
    pub results: Vec<ValidationResult>,
}

impl CategoryRun {
    /// Summary of this run's results.
    pub fn summary(&self) -> Summary {
        summarize(&self.results)
    }
}
