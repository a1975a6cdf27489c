// Handles command-line parsing, the optional config file, and defaults.
//
// Precedence: command line > config file > built-in defaults.
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::source::{ApodApi, FeedSource, StaticFeed};

pub const APP_NAME: &str = "apod-gallery";

fn default_api_url() -> String {
    crate::source::DEFAULT_API_URL.to_string()
}
fn default_static_url() -> String {
    crate::source::DEFAULT_STATIC_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Which feed to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    /// NASA's endpoint, queried by date range.
    #[default]
    Api,
    /// A fixed JSON document.
    Static,
}

#[derive(Debug, Parser, Default)]
#[command(name = APP_NAME, version, about = "Browse NASA's Astronomy Picture of the Day in the terminal")]
pub struct Cli {
    /// Start date (YYYY-MM-DD); the feed is fetched on startup when given
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD); defaults to start + 8 days
    #[arg(long)]
    pub end: Option<String>,

    /// Read the static JSON mirror instead of the API
    #[arg(long = "static")]
    pub use_static: bool,

    /// NASA API key
    #[arg(long, env = "APOD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub api_url: Option<String>,

    #[arg(long)]
    pub static_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Config file (default: <config dir>/apod-gallery/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Contents of `config.toml`.  Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub mode: FeedMode,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_static_url")]
    pub static_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            mode: FeedMode::default(),
            api_url: default_api_url(),
            static_url: default_static_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl FileConfig {
    /// Read `path`.  A missing file yields defaults unless `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                anyhow::bail!("Config file '{}' not found", path.display());
            }
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: FeedMode,
    pub api_url: String,
    pub static_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|d| d.cache_dir().join(format!("{APP_NAME}.log")))
        .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}.log")))
}

impl Config {
    /// Parse the command line and merge it with the config file.
    pub fn load(cli: Cli) -> Result<Self> {
        let file = match (&cli.config, default_config_path()) {
            (Some(path), _) => FileConfig::load(path, true)?,
            (None, Some(path)) => FileConfig::load(&path, false)?,
            (None, None) => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: Cli, file: FileConfig) -> Result<Self> {
        let mode = if cli.use_static {
            FeedMode::Static
        } else {
            file.mode
        };
        let level = cli.log_level.unwrap_or(file.log_level);
        let log_level = level
            .parse::<LevelFilter>()
            .map_err(|_| anyhow::anyhow!("Invalid log level '{level}'"))?;

        Ok(Self {
            mode,
            api_url: cli.api_url.unwrap_or(file.api_url),
            static_url: cli.static_url.unwrap_or(file.static_url),
            api_key: cli
                .api_key
                .or(file.api_key)
                .unwrap_or_else(|| crate::source::DEMO_KEY.to_string()),
            timeout: Duration::from_secs(cli.timeout_secs.unwrap_or(file.timeout_secs)),
            log_file: cli
                .log_file
                .or(file.log_file)
                .unwrap_or_else(default_log_path),
            log_level,
            start: cli.start,
            end: cli.end,
        })
    }

    /// Build the feed source the settings describe.
    pub fn build_source(&self) -> Result<Arc<dyn FeedSource>> {
        let source: Arc<dyn FeedSource> = match self.mode {
            FeedMode::Api => Arc::new(
                ApodApi::new(&self.api_url, &self.api_key, self.timeout)
                    .context("Failed to set up the HTTP client")?,
            ),
            FeedMode::Static => Arc::new(
                StaticFeed::new(&self.static_url, self.timeout)
                    .context("Failed to set up the HTTP client")?,
            ),
        };
        Ok(source)
    }

    /// Whether to fetch right away instead of waiting for input.
    pub fn fetch_on_startup(&self) -> bool {
        self.start.is_some() || self.mode == FeedMode::Static
    }
}
