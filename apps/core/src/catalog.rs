use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::{Catalog, CatalogEntry, EntryKind};

const BUNDLED_SETTINGS: &str = include_str!("../data/WindowsSettings.json");
const BUNDLED_TASK_LINKS: &str = include_str!("../data/TaskLink.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("read failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

impl CatalogSource {
    pub fn or_bundled(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Bundled,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    schema_version: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    windows_version: String,
    items: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
struct CatalogItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    cmd: String,
    #[serde(default)]
    keywords: Vec<Vec<String>>,
    #[serde(default)]
    introduced_in_build: Option<u32>,
    #[serde(default)]
    deprecated_in_build: Option<u32>,
}

pub fn bundled_text(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Setting => BUNDLED_SETTINGS,
        EntryKind::TaskLink => BUNDLED_TASK_LINKS,
    }
}

pub fn parse_catalog(kind: EntryKind, raw: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(raw)?;

    let mut catalog = Catalog::empty(kind);
    catalog.schema_version = document.schema_version;
    catalog.language = document.language;
    catalog.windows_version = document.windows_version;

    for (index, item) in document.items.into_iter().enumerate() {
        let name = item.name.trim();
        let command = item.cmd.trim();
        if name.is_empty() || command.is_empty() {
            warn!(
                kind = kind.as_str(),
                index, "skipping catalog item with empty name or cmd"
            );
            continue;
        }

        catalog.push(
            CatalogEntry::new(kind, name, command)
                .with_keywords(item.keywords)
                .with_build_range(item.introduced_in_build, item.deprecated_in_build),
        );
    }

    Ok(catalog)
}

pub fn load_catalog_file(kind: EntryKind, path: &Path) -> Result<Catalog, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(kind, &raw)
}

pub fn load(kind: EntryKind, source: &CatalogSource) -> Result<Catalog, CatalogError> {
    match source {
        CatalogSource::Bundled => parse_catalog(kind, bundled_text(kind)),
        CatalogSource::File(path) => load_catalog_file(kind, path),
    }
}

/// Loads a catalog, degrading to an empty one on any failure. A broken
/// source never takes the other catalog down with it.
pub fn load_or_empty(kind: EntryKind, source: &CatalogSource) -> Catalog {
    match load(kind, source) {
        Ok(catalog) => {
            debug!(
                kind = kind.as_str(),
                entries = catalog.len(),
                "catalog loaded"
            );
            catalog
        }
        Err(error) => {
            warn!(kind = kind.as_str(), source = ?source, "catalog load failed: {error}");
            Catalog::empty(kind)
        }
    }
}

/// Extra task-link catalogs: each path is a json file or a directory that is
/// walked for json files. Files load independently.
pub fn load_extra_catalogs(kind: EntryKind, paths: &[PathBuf]) -> Catalog {
    let mut merged = Catalog::empty(kind);
    for path in paths {
        for file in discover_catalog_paths(path) {
            let catalog = load_or_empty(kind, &CatalogSource::File(file));
            merged.extend(catalog);
        }
    }
    merged
}

pub fn discover_catalog_paths(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    if !path.is_dir() {
        warn!(path = %path.display(), "extra catalog path does not exist");
        return Vec::new();
    }

    let mut out: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|entry_path| {
            entry_path
                .extension()
                .and_then(|v| v.to_str())
                .is_some_and(|v| v.eq_ignore_ascii_case("json"))
        })
        .collect();
    out.sort();
    out
}
