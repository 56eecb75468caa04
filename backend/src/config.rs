//! Startup configuration.
//!
//! Every value is looked up in the environment first and then in a TOML file
//! (`config_file.toml` unless `CONFIG_FILE` points elsewhere). The result is an
//! immutable [`AppConfig`] handed to the server as managed state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use shared::{validate_options, LabelError, VoteOptions};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "config_file.toml";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("Missing required setting {0}: set it in the environment or in the file named by CONFIG_FILE")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("Invalid vote option: {0}")]
    Label(#[from] LabelError),
    #[error("Failed to resolve hostname: {0}")]
    Hostname(io::Error),
}

/// A file value that may be written either as a TOML string or as a bare
/// boolean/integer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FileValue {
    Text(String),
    Flag(bool),
    Number(i64),
}

impl FileValue {
    fn into_text(self) -> String {
        match self {
            FileValue::Text(text) => text,
            FileValue::Flag(flag) => flag.to_string(),
            FileValue::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileSettings {
    #[serde(rename = "VOTE1VALUE")]
    pub vote1: Option<FileValue>,
    #[serde(rename = "VOTE2VALUE")]
    pub vote2: Option<FileValue>,
    #[serde(rename = "TITLE")]
    pub title: Option<FileValue>,
    #[serde(rename = "SHOWHOST")]
    pub show_host: Option<FileValue>,
    #[serde(rename = "REDIS_URL")]
    pub redis_url: Option<FileValue>,
    #[serde(rename = "STORE_TIMEOUT_MS")]
    pub store_timeout_ms: Option<FileValue>,
}

impl FileSettings {
    /// A missing file is an empty source; unreadable or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Configuration file not found, using environment only");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub options: VoteOptions,
    pub title: String,
    pub show_host: bool,
    pub redis_url: String,
    pub store_timeout: Duration,
}

impl AppConfig {
    /// Reads the process environment and the configuration file, then applies
    /// the hostname override.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let file = FileSettings::load(Path::new(&path))?;
        let config = Self::resolve(file, |key| std::env::var(key).ok(), local_hostname)?;

        info!(
            first = %config.options.first,
            second = %config.options.second,
            title = %config.title,
            show_host = config.show_host,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn resolve<E, H>(file: FileSettings, env: E, hostname: H) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
        H: FnOnce() -> Result<String, ConfigError>,
    {
        let lookup = |key: &'static str, fallback: Option<FileValue>| -> Option<String> {
            env(key).or_else(|| fallback.map(FileValue::into_text))
        };

        let vote1 = lookup("VOTE1VALUE", file.vote1).ok_or(ConfigError::Missing("VOTE1VALUE"))?;
        let vote2 = lookup("VOTE2VALUE", file.vote2).ok_or(ConfigError::Missing("VOTE2VALUE"))?;
        let title = lookup("TITLE", file.title).ok_or(ConfigError::Missing("TITLE"))?;
        let options = validate_options(&vote1, &vote2)?;

        let show_host = lookup("SHOWHOST", file.show_host)
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let redis_url = lookup("REDIS_URL", file.redis_url).unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());

        let store_timeout_ms = match lookup("STORE_TIMEOUT_MS", file.store_timeout_ms) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(ConfigError::Invalid { key: "STORE_TIMEOUT_MS", value: raw }),
            },
            None => DEFAULT_STORE_TIMEOUT_MS,
        };

        let title = if show_host { hostname()? } else { title };

        Ok(Self {
            options,
            title,
            show_host,
            redis_url,
            store_timeout: Duration::from_millis(store_timeout_ms),
        })
    }
}

pub fn local_hostname() -> Result<String, ConfigError> {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .map_err(ConfigError::Hostname)
}
