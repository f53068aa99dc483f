//! # Schema Resolution
//!
//! Picks a schema identifier for a document from where it lives on disk.
//! Rules, first match wins:
//!
//! 1. An ancestor directory (closest first) named exactly like a
//!    category in [`CATEGORY_MAPPING`].
//! 2. A category name appearing anywhere in the lowercased filename,
//!    checked in mapping order.
//! 3. [`DEFAULT_SCHEMA_ID`].
//!
//! Directory placement therefore always beats filename hints. Step 2 is
//! sensitive to mapping order when a filename contains several category
//! names, so the table order is part of the contract.

use std::path::Path;

/// Category directory name → schema identifier, in match order.
pub const CATEGORY_MAPPING: &[(&str, &str)] = &[
    ("backgrounds", "troika-background"),
    ("enemies", "troika-enemy"),
    ("items", "troika-item"),
    ("skills", "troika-skill"),
    ("spells", "troika-spell"),
    ("tables", "troika-table"),
    ("characters", "troika-character"),
];

/// Schema for documents that describe the whole system.
pub const DEFAULT_SCHEMA_ID: &str = "troika-system";

/// Schema identifier mapped to a category directory name, if any.
pub fn schema_for_category(category: &str) -> Option<&'static str> {
    CATEGORY_MAPPING
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, id)| *id)
}

/// Resolve the schema identifier for the document at `path`.
///
/// Never fails; documents matching no category get [`DEFAULT_SCHEMA_ID`].
pub fn resolve(path: &Path) -> &'static str {
    for ancestor in path.ancestors().skip(1) {
        if let Some(id) = ancestor
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(schema_for_category)
        {
            return id;
        }
    }

    if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
        let filename = filename.to_lowercase();
        if let Some((_, id)) = CATEGORY_MAPPING
            .iter()
            .find(|(name, _)| filename.contains(name))
        {
            return *id;
        }
    }

    DEFAULT_SCHEMA_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_directory_wins() {
        assert_eq!(resolve(Path::new("objects/enemies/goblin.json")), "troika-enemy");
        assert_eq!(resolve(Path::new("objects/spells/items-of-power.json")), "troika-spell");
    }

    #[test]
    fn closest_ancestor_is_checked_first() {
        assert_eq!(
            resolve(Path::new("objects/items/skills/lockpicks.json")),
            "troika-skill"
        );
    }

    #[test]
    fn ancestor_must_match_exactly() {
        // "enemies-extra" is not a category; the filename carries no hint either.
        assert_eq!(
            resolve(Path::new("objects/enemies-extra/goblin.json")),
            DEFAULT_SCHEMA_ID
        );
    }

    #[test]
    fn filename_hint_is_case_insensitive() {
        assert_eq!(resolve(Path::new("data/All-Spells.json")), "troika-spell");
        assert_eq!(resolve(Path::new("BACKGROUNDS.json")), "troika-background");
    }

    #[test]
    fn filename_hint_follows_mapping_order() {
        // Both "items" and "tables" appear; "items" comes first in the mapping.
        assert_eq!(resolve(Path::new("tables-of-items.json")), "troika-item");
    }

    #[test]
    fn file_itself_is_not_an_ancestor() {
        // A file literally named like a category still resolves by substring.
        assert_eq!(resolve(Path::new("objects/characters")), "troika-character");
    }

    #[test]
    fn fallback_is_system_schema() {
        assert_eq!(resolve(Path::new("objects/troika-system-data.json")), "troika-system");
        assert_eq!(resolve(Path::new("")), "troika-system");
    }

    #[test]
    fn schema_for_category_lookup() {
        assert_eq!(schema_for_category("tables"), Some("troika-table"));
        assert_eq!(schema_for_category("Tables"), None);
        assert_eq!(CATEGORY_MAPPING.len(), 7);
    }
}
