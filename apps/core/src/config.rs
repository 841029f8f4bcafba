use std::path::{Path, PathBuf};

use serde::Deserialize;

const APP_DIR_NAME: &str = "settingsfind";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_results: u16,
    pub score_keywords: bool,
    pub os_build: Option<u32>,
    pub settings_catalog_path: Option<PathBuf>,
    pub task_link_catalog_path: Option<PathBuf>,
    pub extra_task_link_paths: Vec<PathBuf>,
    pub log_level: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: 20,
            score_keywords: false,
            os_build: None,
            settings_catalog_path: None,
            task_link_catalog_path: None,
            extra_task_link_paths: Vec::new(),
            log_level: "info".to_string(),
            config_path: stable_app_data_dir().join(CONFIG_FILE_NAME),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Reads the config file. `None` means the default location; a missing file
/// yields defaults. `.toml` files are TOML, everything else JSON5.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_app_data_dir().join(CONFIG_FILE_NAME));

    if !path.exists() {
        let config = Config {
            config_path: path,
            ..Config::default()
        };
        validate(&config).map_err(ConfigError::Invalid)?;
        return Ok(config);
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let mut config = parse(&path, &raw)?;
    config.config_path = path;
    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

fn parse(path: &Path, raw: &str) -> Result<Config, ConfigError> {
    let is_toml = path
        .extension()
        .and_then(|v| v.to_str())
        .is_some_and(|v| v.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str::<Config>(raw).map_err(|e| e.to_string())
    } else {
        json5::from_str::<Config>(raw).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_results < 5 || cfg.max_results > 100 {
        return Err("max_results out of range".into());
    }

    if !LOG_LEVELS.contains(&cfg.log_level.to_ascii_lowercase().as_str()) {
        return Err(format!("unknown log_level '{}'", cfg.log_level));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}
