use std::fmt;
use std::sync::Arc;

use crate::action_executor::ActionExecutor;
use crate::model::{Catalog, CatalogEntry, EntryKind};
use crate::search::MatchEngine;

pub const LIGHT_ICON_PATH: &str = "Images/WindowsSettings.light.png";
pub const DARK_ICON_PATH: &str = "Images/WindowsSettings.dark.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconTheme {
    #[default]
    Light,
    Dark,
}

impl IconTheme {
    pub fn icon_path(self) -> &'static str {
        match self {
            Self::Light => LIGHT_ICON_PATH,
            Self::Dark => DARK_ICON_PATH,
        }
    }
}

type InvokeFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// A ranked row handed to the host UI. `invoke` runs the entry's action;
/// `entry` is the context data used for the context menu.
#[derive(Clone)]
pub struct ResultRecord {
    pub title: String,
    pub subtitle: String,
    pub score: u32,
    pub kind: EntryKind,
    pub icon_path: &'static str,
    pub entry: Arc<CatalogEntry>,
    invoke: InvokeFn,
}

impl ResultRecord {
    pub fn invoke(&self) -> bool {
        (self.invoke)()
    }
}

impl fmt::Debug for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultRecord")
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("score", &self.score)
            .field("kind", &self.kind)
            .field("icon_path", &self.icon_path)
            .finish_non_exhaustive()
    }
}

pub fn assemble(
    engine: &MatchEngine,
    executor: &Arc<ActionExecutor>,
    catalog: &Catalog,
    query: &str,
    theme: IconTheme,
) -> Vec<ResultRecord> {
    engine
        .rank(query, catalog)
        .into_iter()
        .map(|scored| {
            let entry = Arc::clone(scored.entry);
            let invoke: InvokeFn = {
                let executor = Arc::clone(executor);
                let entry = Arc::clone(&entry);
                Arc::new(move || executor.invoke(&entry))
            };
            ResultRecord {
                title: entry.name.clone(),
                subtitle: entry.command.clone(),
                score: scored.score,
                kind: entry.kind,
                icon_path: theme.icon_path(),
                entry,
                invoke,
            }
        })
        .collect()
}

/// Settings results first, then task links. Each half keeps its own score
/// order; the two are not re-sorted against each other.
pub fn merge_append(settings: Vec<ResultRecord>, task_links: Vec<ResultRecord>) -> Vec<ResultRecord> {
    let mut merged = settings;
    merged.extend(task_links);
    merged
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextMenuAction {
    CopyToClipboard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuEntry {
    pub title: String,
    pub subtitle: String,
    pub icon_path: &'static str,
    pub action: ContextMenuAction,
}

pub fn context_menu(record: &ResultRecord) -> Vec<ContextMenuEntry> {
    vec![ContextMenuEntry {
        title: "Copy command".to_string(),
        subtitle: record.entry.command.clone(),
        icon_path: record.icon_path,
        action: ContextMenuAction::CopyToClipboard(record.entry.command.clone()),
    }]
}
