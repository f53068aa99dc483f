//! Integration test: build a small on-disk corpus laid out like the real
//! repository (`systems/` + `objects/<category>/`) and validate it end to
//! end through store loading, path resolution, validation, and summary.

use std::path::{Path, PathBuf};

use serde_json::json;
use troika_schema::{
    summarize, InitializationError, SchemaStore, SchemaValidator, ViolationKind, SYSTEM_DATA_FILE,
};

fn write_json(path: &Path, value: &serde_json::Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Lay out schemas and objects under `root`, returning (systems, objects).
fn build_corpus(root: &Path) -> (PathBuf, PathBuf) {
    let systems = root.join("systems");
    let objects = root.join("objects");

    write_json(
        &systems.join("item.schema.json"),
        &json!({
            "$id": "troika-item",
            "title": "Troika Item",
            "type": "object",
            "required": ["name", "value"],
            "properties": {
                "name": {"type": "string"},
                "value": {"type": "integer", "minimum": 0},
                "type": {"enum": ["weapon", "tool", "equipment", "artifact", "component"]}
            }
        }),
    );
    write_json(
        &systems.join("enemy.schema.json"),
        &json!({
            "$id": "troika-enemy",
            "type": "object",
            "required": ["name", "skill", "stamina"],
            "properties": {
                "name": {"type": "string"},
                "skill": {"type": "integer", "minimum": 1},
                "stamina": {"type": "integer"},
                "damage": {"$ref": "#/definitions/damage"}
            }
        }),
    );
    write_json(
        &systems.join("system.schema.json"),
        &json!({
            "$id": "troika-system",
            "type": "object",
            "required": ["items"],
            "properties": {
                "items": {"type": "array", "items": {"$ref": "troika-item"}}
            }
        }),
    );
    std::fs::write(systems.join("README.md"), "schemas live here").unwrap();

    write_json(
        &objects.join("items/fusil.json"),
        &json!({"name": "Fusil", "value": 40, "type": "weapon"}),
    );
    write_json(
        &objects.join("items/knuckle-dice.json"),
        &json!({"name": "Knuckle Dice", "value": "2_silver", "type": "tool"}),
    );
    write_json(
        &objects.join("enemies/goblin.json"),
        &json!({"name": "Goblin", "skill": 5, "stamina": 6, "damage": {"roll": 1}}),
    );
    std::fs::write(objects.join("enemies/broken.json"), "{ nope").unwrap();
    write_json(
        &objects.join(SYSTEM_DATA_FILE),
        &json!({"items": [{"name": "Rope", "value": 1}]}),
    );

    (systems, objects)
}

#[test]
fn loads_schemas_by_declared_id() {
    let root = tempfile::tempdir().unwrap();
    let (systems, _) = build_corpus(root.path());

    let store = SchemaStore::load(&systems).expect("Failed to load schemas");
    assert_eq!(store.ids(), vec!["troika-enemy", "troika-item", "troika-system"]);
    assert_eq!(store.get("troika-item").unwrap().title(), Some("Troika Item"));
}

#[test]
fn schema_directory_without_schema_files_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let systems = root.path().join("systems");
    std::fs::create_dir(&systems).unwrap();
    std::fs::write(systems.join("item.json"), "{}").unwrap();

    let err = SchemaStore::load(&systems).unwrap_err();
    assert!(matches!(err, InitializationError::NoSchemasFound(_)));
    assert!(err.to_string().contains("No schema files found"));
}

#[test]
fn validates_directory_recursively_with_resolved_schemas() {
    let root = tempfile::tempdir().unwrap();
    let (systems, objects) = build_corpus(root.path());
    let store = SchemaStore::load(&systems).unwrap();
    let validator = SchemaValidator::new(&store);

    let results = validator.validate_directory(&objects, true, None);
    let summary = summarize(&results);

    eprintln!(
        "\n=== Corpus Validation Results ===\n\
         Total:   {}\n\
         Valid:   {}\n\
         Invalid: {}\n",
        summary.total, summary.valid, summary.invalid
    );

    assert_eq!(summary.total, 5);
    assert_eq!(summary.valid, 3);
    assert_eq!(summary.invalid, 2);

    let by_name = |name: &str| {
        results
            .iter()
            .find(|r| r.file_name() == name)
            .unwrap_or_else(|| panic!("no result for {name}"))
    };

    let goblin = by_name("goblin.json");
    assert!(goblin.valid, "degraded $ref should accept an object: {:?}", goblin.errors);
    assert_eq!(goblin.schema_used.as_deref(), Some("troika-enemy"));

    let dice = by_name("knuckle-dice.json");
    assert!(!dice.valid);
    assert_eq!(dice.schema_used.as_deref(), Some("troika-item"));
    assert_eq!(dice.errors.len(), 1);
    assert_eq!(dice.errors[0].dotted_path(), "value");

    let broken = by_name("broken.json");
    assert_eq!(broken.errors[0].kind, ViolationKind::DocumentParse);
    assert!(broken.schema_used.is_none());

    let system = by_name(SYSTEM_DATA_FILE);
    assert!(system.valid, "errors: {:?}", system.errors);
    assert_eq!(system.schema_used.as_deref(), Some("troika-system"));
}

#[test]
fn category_run_visits_existing_categories_and_system_file() {
    let root = tempfile::tempdir().unwrap();
    let (systems, objects) = build_corpus(root.path());
    let store = SchemaStore::load(&systems).unwrap();

    let runs = SchemaValidator::new(&store).validate_by_categories(&objects);
    let labels: Vec<&str> = runs.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["enemies", "items", SYSTEM_DATA_FILE]);

    let items = &runs[1];
    assert_eq!(items.summary().total, 2);
    assert_eq!(items.summary().invalid, 1);
}

#[test]
fn explicit_schema_override_applies_to_every_file() {
    let root = tempfile::tempdir().unwrap();
    let (systems, objects) = build_corpus(root.path());
    let store = SchemaStore::load(&systems).unwrap();

    let results = SchemaValidator::new(&store).validate_directory(
        &objects.join("items"),
        false,
        Some("troika-enemy"),
    );
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.schema_used.as_deref() == Some("troika-enemy") && !r.valid));
}

#[test]
fn missing_schema_for_resolved_category_is_recorded() {
    let root = tempfile::tempdir().unwrap();
    let (systems, objects) = build_corpus(root.path());
    write_json(&objects.join("spells/sleep.json"), &json!({"name": "Sleep"}));
    let store = SchemaStore::load(&systems).unwrap();

    let result =
        SchemaValidator::new(&store).validate_file(&objects.join("spells/sleep.json"), None);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ViolationKind::SchemaNotFound);
    assert_eq!(result.errors[0].message, "Schema 'troika-spell' not found");
    assert!(result.schema_used.is_none());
}

#[test]
fn silver_rewrite_makes_corpus_valid() {
    let root = tempfile::tempdir().unwrap();
    let (systems, objects) = build_corpus(root.path());
    std::fs::remove_file(objects.join("enemies/broken.json")).unwrap();
    let store = SchemaStore::load(&systems).unwrap();
    let validator = SchemaValidator::new(&store);

    assert!(!summarize(&validator.validate_directory(&objects, true, None)).all_valid());

    let report = troika_schema::silver::convert_corpus(&objects, false).unwrap();
    assert_eq!(report.total_changes(), 1);

    let after = summarize(&validator.validate_directory(&objects, true, None));
    assert!(after.all_valid(), "{after:?}");
}
