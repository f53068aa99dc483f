//! # Corpus Discovery
//!
//! Finds target `*.json` documents on disk in a stable, sorted order.

use std::io;
use std::path::{Path, PathBuf};

/// All `*.json` files in `dir`, sorted. Descends into subdirectories
/// when `recursive` is set.
///
/// Symlinked directories are not descended into, so a link back up the
/// tree cannot repeat files. Symlinks to `*.json` files are listed.
///
/// # Errors
///
/// Fails only if `dir` itself cannot be listed. Unreadable
/// subdirectories are skipped.
pub fn discover(dir: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            if recursive {
                if let Ok(nested) = discover(&path, true) {
                    files.extend(nested);
                }
            }
        } else if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
