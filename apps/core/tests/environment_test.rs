use std::sync::Arc;

use serde_json::json;
use settingsfind_core::action_executor::SystemLauncher;
use settingsfind_core::catalog::parse_catalog;
use settingsfind_core::config::Config;
use settingsfind_core::environment::{filter_catalog, EnvironmentDescriptor};
use settingsfind_core::model::{EntryKind, Query};
use settingsfind_core::plugin::{PluginContext, SettingsPlugin};
use settingsfind_core::results::IconTheme;
use settingsfind_core::search::SkimScorer;

fn versioned_catalog() -> serde_json::Value {
    json!({
        "items": [
            {"name": "Widgets", "cmd": "ms-settings:widgets", "keywords": [], "introduced_in_build": 22000},
            {"name": "Cortana", "cmd": "ms-settings:cortana", "keywords": [], "deprecated_in_build": 22000},
            {"name": "Display settings", "cmd": "ms-settings:display", "keywords": []}
        ]
    })
}

fn names(catalog: &settingsfind_core::model::Catalog) -> Vec<String> {
    catalog.entries().iter().map(|e| e.name.clone()).collect()
}

#[test]
fn filters_by_build_window() {
    let raw = versioned_catalog().to_string();

    let old = filter_catalog(
        parse_catalog(EntryKind::Setting, &raw).unwrap(),
        &EnvironmentDescriptor::with_build(19045),
    );
    assert_eq!(names(&old), vec!["Cortana", "Display settings"]);

    let new = filter_catalog(
        parse_catalog(EntryKind::Setting, &raw).unwrap(),
        &EnvironmentDescriptor::with_build(22631),
    );
    assert_eq!(names(&new), vec!["Widgets", "Display settings"]);
}

#[test]
fn unconstrained_entries_always_pass() {
    let raw = json!({"items": [{"name": "About", "cmd": "ms-settings:about", "keywords": []}]}).to_string();
    for build in [0, 10240, 22631, u32::MAX] {
        let filtered = filter_catalog(
            parse_catalog(EntryKind::Setting, &raw).unwrap(),
            &EnvironmentDescriptor::with_build(build),
        );
        assert_eq!(filtered.len(), 1);
    }
}

#[test]
fn filtered_entries_never_appear_in_results() {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    std::fs::write(&settings_path, versioned_catalog().to_string()).unwrap();

    let config = Config {
        settings_catalog_path: Some(settings_path),
        ..Config::default()
    };
    let mut plugin = SettingsPlugin::new();
    plugin.init(PluginContext {
        config,
        environment: EnvironmentDescriptor::with_build(19045),
        scorer: Arc::new(SkimScorer::default()),
        launcher: Arc::new(SystemLauncher),
        theme: IconTheme::Light,
    });

    for query in ["widgets", "widget", "ms-settings:widgets", "w", "gets"] {
        assert!(
            plugin
                .query(&Query::new(query))
                .iter()
                .all(|result| result.title != "Widgets"),
            "query {query:?} leaked a filtered entry"
        );
    }
}

#[test]
fn configured_build_override_drives_plugin_filter() {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    std::fs::write(&settings_path, versioned_catalog().to_string()).unwrap();

    let config = Config {
        settings_catalog_path: Some(settings_path),
        os_build: Some(22631),
        ..Config::default()
    };
    let mut plugin = SettingsPlugin::new();
    plugin.init(PluginContext::from_config(config));

    let settings = plugin.settings_catalog().unwrap();
    assert_eq!(names(settings), vec!["Widgets", "Display settings"]);
}
