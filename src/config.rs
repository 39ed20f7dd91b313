use std::path::{Path, PathBuf};

use clap::Parser;
use reqwest::Url;
use serde::Deserialize;

use crate::router::Route;
use crate::state::error::ConfigError;

/// Command line flags, the last configuration layer
#[derive(Parser, Debug, Default)]
#[command(name = "nutrix", version, about = "Nutrition label analyzer")]
pub struct Cli {
    /// Base URL of the analysis service
    #[arg(long)]
    pub service_url: Option<String>,

    /// Route to open on startup ("/" or "/analyze")
    #[arg(long)]
    pub route: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub service_url: String,
    pub initial_route: Route,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".into(),
            initial_route: Route::Landing,
            log_filter: "info".into(),
        }
    }
}

/// Keys accepted in the config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    service_url: Option<String>,
    initial_route: Option<String>,
    log_filter: Option<String>,
}

/// Load settings: defaults, then config file, then environment, then flags
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    load_settings_with_env(cli, |key| std::env::var(key).ok())
}

/// Same layering with the environment supplied by `env`
fn load_settings_with_env<F>(cli: &Cli, env: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    let file_cfg = match &cli.config {
        Some(path) => Some(read_config_file(path)?),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => Some(read_config_file(&path)?),
            None => None,
        },
    };

    if let Some(file_cfg) = file_cfg {
        if let Some(v) = file_cfg.service_url {
            settings.service_url = v;
        }
        if let Some(v) = file_cfg.initial_route {
            settings.initial_route = v.parse()?;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Some(v) = env("NUTRIX_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("NUTRIX_INITIAL_ROUTE") {
        settings.initial_route = v.parse()?;
    }
    if let Some(v) = env("NUTRIX_LOG") {
        settings.log_filter = v;
    }

    if let Some(v) = &cli.service_url {
        settings.service_url = v.clone();
    }
    if let Some(v) = &cli.route {
        settings.initial_route = v.parse()?;
    }

    validate_service_url(&settings.service_url)?;

    Ok(settings)
}

/// `<config dir>/nutrix/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("nutrix");
    path.push("config.toml");
    Some(path)
}

fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn validate_service_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::ServiceUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
