use crate::model::state::DEFAULT_TOP_N;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Backend address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the dataset backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Initial value of the row-count input
    #[serde(default = "default_top_n")]
    pub default_top_n: String,
    /// Where saved charts go; defaults to `<config dir>/charts`
    #[serde(default)]
    pub chart_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_top_n() -> String {
    DEFAULT_TOP_N.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_top_n: default_top_n(),
            chart_dir: None,
        }
    }
}

/// Command-line overrides
#[derive(Debug, Default, Parser)]
#[command(name = "datadash", version, about = "Terminal dashboard for a dataset Q&A backend")]
pub struct Cli {
    /// Backend base URL (e.g. http://127.0.0.1:5000)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Initial number of rows to preview
    #[arg(long, allow_hyphen_values = true)]
    pub top_n: Option<String>,

    /// Directory for saved chart images
    #[arg(long)]
    pub chart_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG also works
    #[arg(long)]
    pub log_level: Option<tracing::Level>,

    /// Log file path (defaults to ~/.datadash/datadash.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the effective settings back to the config file
    #[arg(long)]
    pub save_config: bool,
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".datadash"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Apply command-line overrides on top of file values
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(ref base_url) = cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(ref top_n) = cli.top_n {
            self.default_top_n = top_n.clone();
        }
        if let Some(ref chart_dir) = cli.chart_dir {
            self.chart_dir = Some(chart_dir.clone());
        }
        self
    }

    /// Resolved directory for saved charts
    pub fn chart_dir(&self) -> PathBuf {
        self.chart_dir
            .clone()
            .or_else(|| Self::config_dir().map(|dir| dir.join("charts")))
            .unwrap_or_else(|| PathBuf::from("charts"))
    }
}
