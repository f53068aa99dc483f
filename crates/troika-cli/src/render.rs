//! # Text Rendering
//!
//! Plain-text summary and result tables. Error lists are truncated here,
//! and only here; the library always returns the full list.
//!
//! The status column is green for valid and red for invalid documents
//! when `colored` decides the terminal supports it.

use std::fmt::Write as _;

use colored::Colorize;
use troika_schema::{SchemaStore, Summary, ValidationResult};

/// Summary block for a batch of results.
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Validation Summary\n  Total files: {}\n  Valid: {}\n  Invalid: {}\n",
        summary.total, summary.valid, summary.invalid
    )
}

/// Error column text: at most `max_errors` lines, then `... and N more`.
pub fn error_lines(result: &ValidationResult, max_errors: usize) -> Vec<String> {
    let mut lines: Vec<String> = result
        .errors
        .iter()
        .take(max_errors)
        .map(ToString::to_string)
        .collect();
    if result.errors.len() > max_errors {
        lines.push(format!("... and {} more", result.errors.len() - max_errors));
    }
    lines
}

/// Summary block followed by one row per result.
pub fn render_results(results: &[ValidationResult], max_errors: usize) -> String {
    if results.is_empty() {
        return "No validation results to display.\n".to_string();
    }

    let rows: Vec<[String; 3]> = results
        .iter()
        .map(|r| {
            [
                r.file_name(),
                if r.valid { "✓ Valid" } else { "✗ Invalid" }.to_string(),
                r.schema_used.clone().unwrap_or_else(|| "Unknown".to_string()),
            ]
        })
        .collect();

    let headers = ["File", "Status", "Schema"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = render_summary(&troika_schema::summarize(results));
    out.push('\n');

    let pad = |cell: &str, width: usize| {
        let fill = width.saturating_sub(cell.chars().count());
        format!("{cell}{}", " ".repeat(fill))
    };

    let _ = writeln!(
        out,
        "{}  {}  {}  Errors",
        pad(headers[0], widths[0]),
        pad(headers[1], widths[1]),
        pad(headers[2], widths[2]),
    );
    let rule = widths.iter().sum::<usize>() + 6 + "Errors".len();
    let _ = writeln!(out, "{}", "-".repeat(rule));

    let indent = " ".repeat(widths.iter().sum::<usize>() + 6);
    for (row, result) in rows.iter().zip(results) {
        let errors = error_lines(result, max_errors);
        let status = pad(row[1].as_str(), widths[1]);
        let status = if result.valid { status.green() } else { status.red() };
        let line = format!(
            "{}  {}  {}  {}",
            pad(row[0].as_str(), widths[0]),
            status,
            pad(row[2].as_str(), widths[2]),
            errors.first().map(String::as_str).unwrap_or_default(),
        );
        let _ = writeln!(out, "{}", line.trim_end());
        for extra in errors.iter().skip(1) {
            let _ = writeln!(out, "{indent}{extra}");
        }
    }

    out
}

/// Table of loaded schemas: identifier, title, description.
pub fn render_schema_list(store: &SchemaStore) -> String {
    let mut out = String::from("Available Schemas\n");
    let width = store
        .ids()
        .iter()
        .map(|id| id.chars().count())
        .max()
        .unwrap_or(0)
        .max("Schema ID".len());

    let _ = writeln!(out, "  {:<width$}  Title / Description", "Schema ID");
    for schema in store.iter() {
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            schema.id(),
            schema.title().unwrap_or("No title"),
        );
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            "",
            schema.description().unwrap_or("No description"),
        );
    }
    out
}
