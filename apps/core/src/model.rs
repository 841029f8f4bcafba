use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Setting,
    TaskLink,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setting => "setting",
            Self::TaskLink => "task_link",
        }
    }
}

/// One searchable row: a Windows setting or a task link. Both kinds share
/// the same shape and only differ in which catalog they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: EntryKind,
    pub name: String,
    pub command: String,
    pub keyword_groups: Vec<Vec<String>>,
    pub introduced_in_build: Option<u32>,
    pub deprecated_in_build: Option<u32>,
}

impl CatalogEntry {
    pub fn new(kind: EntryKind, name: &str, command: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            command: command.to_string(),
            keyword_groups: Vec::new(),
            introduced_in_build: None,
            deprecated_in_build: None,
        }
    }

    pub fn with_keywords(mut self, keyword_groups: Vec<Vec<String>>) -> Self {
        self.keyword_groups = keyword_groups;
        self
    }

    pub fn with_build_range(mut self, introduced: Option<u32>, deprecated: Option<u32>) -> Self {
        self.introduced_in_build = introduced;
        self.deprecated_in_build = deprecated;
        self
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keyword_groups
            .iter()
            .flat_map(|group| group.iter().map(String::as_str))
    }
}

/// Ordered, immutable-after-load list of entries of a single kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub kind: EntryKind,
    pub schema_version: String,
    pub language: String,
    pub windows_version: String,
    entries: Vec<Arc<CatalogEntry>>,
}

impl Catalog {
    pub fn empty(kind: EntryKind) -> Self {
        Self {
            kind,
            schema_version: String::new(),
            language: String::new(),
            windows_version: String::new(),
            entries: Vec::new(),
        }
    }

    pub fn from_entries(kind: EntryKind, entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self::empty(kind);
        catalog.entries = entries.into_iter().map(Arc::new).collect();
        catalog
    }

    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(Arc::new(entry));
    }

    /// Appends another catalog's entries, keeping this catalog's metadata.
    pub fn extend(&mut self, other: Catalog) {
        self.entries.extend(other.entries);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&CatalogEntry) -> bool) {
        self.entries.retain(|entry| keep(entry));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub search: String,
}

impl Query {
    pub fn new(search: &str) -> Self {
        Self {
            search: search.to_string(),
        }
    }
}

pub fn fold_case(input: &str) -> String {
    input.chars().flat_map(char::to_lowercase).collect()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}
