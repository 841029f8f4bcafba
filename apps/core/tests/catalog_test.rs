use std::path::PathBuf;

use serde_json::json;
use settingsfind_core::catalog::{
    discover_catalog_paths, load, load_extra_catalogs, load_or_empty, parse_catalog, CatalogError,
    CatalogSource,
};
use settingsfind_core::model::EntryKind;

#[test]
fn loads_every_well_formed_item_with_identical_fields() {
    let document = json!({
        "schema_version": "1.0",
        "language": "en-US",
        "windows_version": "10.0",
        "items": [
            {"name": "Control Panel", "cmd": "control.exe", "keywords": [["classic"], ["cpl", "panel"]]},
            {"name": "Device Manager", "cmd": "devmgmt.msc", "keywords": []},
            {"name": "Hosts File", "cmd": "notepad.exe %SystemRoot%\\hosts", "keywords": [["dns"]]}
        ]
    });

    let catalog = parse_catalog(EntryKind::TaskLink, &document.to_string()).unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.schema_version, "1.0");
    assert_eq!(catalog.language, "en-US");
    assert_eq!(catalog.windows_version, "10.0");
    let first = &catalog.entries()[0];
    assert_eq!(first.kind, EntryKind::TaskLink);
    assert_eq!(first.name, "Control Panel");
    assert_eq!(first.command, "control.exe");
    assert_eq!(
        first.keyword_groups,
        vec![
            vec!["classic".to_string()],
            vec!["cpl".to_string(), "panel".to_string()]
        ]
    );
    assert_eq!(catalog.entries()[2].command, "notepad.exe %SystemRoot%\\hosts");
}

#[test]
fn reads_build_constraints() {
    let document = json!({
        "items": [
            {"name": "Widgets", "cmd": "ms-settings:widgets", "keywords": [], "introduced_in_build": 22000},
            {"name": "Cortana", "cmd": "ms-settings:cortana", "deprecated_in_build": 22000}
        ]
    });

    let catalog = parse_catalog(EntryKind::Setting, &document.to_string()).unwrap();

    assert_eq!(catalog.entries()[0].introduced_in_build, Some(22000));
    assert_eq!(catalog.entries()[1].deprecated_in_build, Some(22000));
    assert!(catalog.entries()[1].keyword_groups.is_empty());
}

#[test]
fn malformed_resource_degrades_to_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("TaskLink.json");
    std::fs::write(&path, b"{ \"items\": [ {\"name\": ").unwrap();

    let source = CatalogSource::File(path);
    assert!(matches!(load(EntryKind::TaskLink, &source), Err(CatalogError::Parse(_))));

    let catalog = load_or_empty(EntryKind::TaskLink, &source);
    assert!(catalog.is_empty());
    assert_eq!(catalog.kind, EntryKind::TaskLink);
}

#[test]
fn wrong_shape_degrades_to_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, json!({"items": [{"name": "A", "cmd": "a", "keywords": ["flat"]}]}).to_string())
        .unwrap();

    assert!(load_or_empty(EntryKind::Setting, &CatalogSource::File(path)).is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let missing = PathBuf::from("definitely-missing-catalog.json");
    let result = load(EntryKind::Setting, &CatalogSource::File(missing));
    assert!(matches!(result, Err(CatalogError::Io { .. })));
}

#[test]
fn bundled_source_is_used_without_override() {
    assert_eq!(CatalogSource::or_bundled(None), CatalogSource::Bundled);
    let catalog = load_or_empty(EntryKind::Setting, &CatalogSource::Bundled);
    assert!(catalog
        .entries()
        .iter()
        .any(|entry| entry.command == "ms-settings:display"));
}

#[test]
fn extra_catalogs_load_recursively_and_fail_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        dir.path().join("a.json"),
        json!({"items": [{"name": "Alpha", "cmd": "alpha.exe", "keywords": []}]}).to_string(),
    )
    .unwrap();
    std::fs::write(
        nested.join("b.json"),
        json!({"items": [{"name": "Beta", "cmd": "beta.exe", "keywords": []}]}).to_string(),
    )
    .unwrap();
    std::fs::write(nested.join("broken.json"), b"not json").unwrap();
    std::fs::write(nested.join("notes.txt"), b"ignored").unwrap();

    let found = discover_catalog_paths(dir.path());
    assert_eq!(found.len(), 3);

    let merged = load_extra_catalogs(EntryKind::TaskLink, &[dir.path().to_path_buf()]);
    let names: Vec<&str> = merged.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[test]
fn missing_extra_path_yields_nothing() {
    let merged = load_extra_catalogs(
        EntryKind::TaskLink,
        &[PathBuf::from("no-such-dir-for-task-links")],
    );
    assert!(merged.is_empty());
}
