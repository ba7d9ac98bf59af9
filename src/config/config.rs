// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host address to bind (e.g., "127.0.0.1")
    pub host: String,

    /// TCP port to bind
    pub port: u16,

    /// Directory receiving uploaded photos, created on startup if absent
    pub cache_dir: PathBuf,

    /// Directory holding RegisterForm.html and SearchForm.html
    pub static_dir: PathBuf,

    /// Largest accepted request body, photo uploads included
    pub max_upload_bytes: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log line format
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown log format: {other}")),
        }
    }
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with a custom environment lookup
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config_path = env("INVENTORY_CONFIG").unwrap_or_else(|| "config.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(Path::new(&config_path))?
        } else {
            Config::default()
        };

        if let Some(val) = env("INVENTORY_HOST") {
            config.host = val;
        }
        if let Some(val) = env("INVENTORY_PORT") {
            config.port = val
                .parse()
                .with_context(|| format!("Invalid INVENTORY_PORT: {val}"))?;
        }
        if let Some(val) = env("INVENTORY_CACHE_DIR") {
            config.cache_dir = PathBuf::from(val);
        }
        if let Some(val) = env("INVENTORY_STATIC_DIR") {
            config.static_dir = PathBuf::from(val);
        }
        if let Some(val) = env("INVENTORY_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = val
                .parse()
                .with_context(|| format!("Invalid INVENTORY_MAX_UPLOAD_BYTES: {val}"))?;
        }
        if let Some(val) = env("INVENTORY_LOG_LEVEL") {
            config.log_level = val;
        }
        if let Some(val) = env("INVENTORY_LOG_FORMAT") {
            config.log_format = val.parse()?;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply command line flags on top of file and environment settings
    pub fn apply_cli(mut self, cli: Cli) -> Self {
        if let Some(host) = cli.host {
            self.host = host;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(cache) = cli.cache {
            self.cache_dir = cache;
        }
        if let Some(static_dir) = cli.static_dir {
            self.static_dir = static_dir;
        }
        self
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL the service answers on
    pub fn origin(&self) -> String {
        format!("http://{}", self.bind_addr())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 3000,
            cache_dir: PathBuf::from("cache"),
            static_dir: PathBuf::from("static"),
            max_upload_bytes: 10 * 1024 * 1024, // 10MB
            log_level: String::from("info"),
            log_format: LogFormat::Pretty,
        }
    }
}
