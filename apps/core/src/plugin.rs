use std::sync::Arc;

use tracing::info;

use crate::action_executor::{ActionExecutor, ProcessLauncher, SystemLauncher};
use crate::catalog::{self, CatalogSource};
use crate::config::Config;
use crate::environment::{filter_catalog, EnvironmentDescriptor};
use crate::model::{Catalog, EntryKind, Query};
use crate::results::{self, ContextMenuEntry, IconTheme, ResultRecord};
use crate::search::{FuzzyScorer, MatchEngine, SkimScorer};

pub const PLUGIN_TITLE: &str = "Windows Settings";
pub const PLUGIN_DESCRIPTION: &str = "Search Windows settings and task links";

/// Everything the host hands the plugin at init time.
pub struct PluginContext {
    pub config: Config,
    pub environment: EnvironmentDescriptor,
    pub scorer: Arc<dyn FuzzyScorer>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub theme: IconTheme,
}

impl PluginContext {
    pub fn from_config(config: Config) -> Self {
        let environment = EnvironmentDescriptor::detect().with_build_override(config.os_build);
        Self {
            config,
            environment,
            scorer: Arc::new(SkimScorer::default()),
            launcher: Arc::new(SystemLauncher),
            theme: IconTheme::default(),
        }
    }
}

struct PluginState {
    settings: Catalog,
    task_links: Catalog,
    engine: MatchEngine,
    executor: Arc<ActionExecutor>,
    max_results: usize,
}

#[derive(Default)]
pub struct SettingsPlugin {
    state: Option<PluginState>,
    theme: IconTheme,
    disposed: bool,
}

impl SettingsPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, context: PluginContext) {
        let PluginContext {
            config,
            environment,
            scorer,
            launcher,
            theme,
        } = context;

        let settings = catalog::load_or_empty(
            EntryKind::Setting,
            &CatalogSource::or_bundled(config.settings_catalog_path.as_deref()),
        );
        let mut task_links = catalog::load_or_empty(
            EntryKind::TaskLink,
            &CatalogSource::or_bundled(config.task_link_catalog_path.as_deref()),
        );
        task_links.extend(catalog::load_extra_catalogs(
            EntryKind::TaskLink,
            &config.extra_task_link_paths,
        ));

        let settings = filter_catalog(settings, &environment);
        let task_links = filter_catalog(task_links, &environment);
        info!(
            settings = settings.len(),
            task_links = task_links.len(),
            build = ?environment.build,
            "plugin initialized"
        );

        self.theme = theme;
        self.disposed = false;
        self.state = Some(PluginState {
            settings,
            task_links,
            engine: MatchEngine::new(scorer).with_keyword_scoring(config.score_keywords),
            executor: Arc::new(ActionExecutor::new(launcher)),
            max_results: config.max_results as usize,
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn query(&self, query: &Query) -> Vec<ResultRecord> {
        let Some(state) = &self.state else {
            return Vec::new();
        };

        let search = query.search.as_str();
        let mut settings = results::assemble(
            &state.engine,
            &state.executor,
            &state.settings,
            search,
            self.theme,
        );
        let mut task_links = results::assemble(
            &state.engine,
            &state.executor,
            &state.task_links,
            search,
            self.theme,
        );

        // Capped per catalog so a busy settings list never hides task links.
        settings.truncate(state.max_results);
        task_links.truncate(state.max_results);
        results::merge_append(settings, task_links)
    }

    pub fn load_context_menu(&self, selected: &ResultRecord) -> Vec<ContextMenuEntry> {
        if self.state.is_none() {
            return Vec::new();
        }
        results::context_menu(selected)
    }

    pub fn set_theme(&mut self, theme: IconTheme) {
        self.theme = theme;
    }

    pub fn settings_catalog(&self) -> Option<&Catalog> {
        self.state.as_ref().map(|state| &state.settings)
    }

    pub fn task_link_catalog(&self) -> Option<&Catalog> {
        self.state.as_ref().map(|state| &state.task_links)
    }

    pub fn translated_title(&self) -> &'static str {
        PLUGIN_TITLE
    }

    pub fn translated_description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.state = None;
        info!("plugin disposed");
    }
}
