use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::contract::QueryResponse;
use crate::model::Query;
use crate::plugin::{PluginContext, SettingsPlugin};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging init failed: {0}")]
    Logging(#[from] std::io::Error),
    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
    #[error("launch failed for '{0}'")]
    Launch(String),
}

impl RuntimeError {
    /// Process exit status: 2 for bad invocations, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub launch: bool,
    pub query: String,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, RuntimeError> {
    let mut options = CliOptions::default();
    let mut words = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| RuntimeError::Usage("--config requires a path".to_string()))?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--json" => options.json = true,
            "--launch" => options.launch = true,
            other if other.starts_with("--") => {
                return Err(RuntimeError::Usage(format!("unknown flag '{other}'")));
            }
            other => words.push(other.to_string()),
        }
    }

    options.query = words.join(" ");
    if options.query.trim().is_empty() {
        return Err(RuntimeError::Usage(
            "usage: settingsfind-core [--config <path>] [--json] [--launch] <query>".to_string(),
        ));
    }
    Ok(options)
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    crate::logging::init(&config.log_level)?;

    let mut plugin = SettingsPlugin::new();
    plugin.init(PluginContext::from_config(config));

    let results = plugin.query(&Query::new(&options.query));
    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&QueryResponse::from_records(&results))?
        );
    } else {
        for record in &results {
            println!("{}\t{}\t{}", record.score, record.title, record.subtitle);
        }
    }

    if options.launch {
        if let Some(top) = results.first() {
            if !top.invoke() {
                return Err(RuntimeError::Launch(top.title.clone()));
            }
        }
    }

    plugin.dispose();
    Ok(())
}
