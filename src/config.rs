//! Configuration management.
//!
//! Effective values live in [`Settings`]. They start from defaults, are
//! overlaid by an optional config file ([`Config`], TOML/YAML/JSON) and
//! finally by `PNCP_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::cache::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::http_client::{DEFAULT_BASE_URL, USER_AGENT};
use crate::rate_limit::{
    BackoffConfig, DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES, DEFAULT_MIN_INTERVAL,
};

/// Config filename looked up in the working directory.
pub const LOCAL_CONFIG_FILENAME: &str = "licitacoes.toml";

/// Default results per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default bind address for `serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

/// Application settings.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Search endpoint.
    pub base_url: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Minimum spacing between upstream calls in milliseconds.
    pub min_interval_ms: u64,
    /// First backoff step in milliseconds.
    pub backoff_base_ms: u64,
    /// Retries after a rate-limit response.
    pub max_retries: u32,
    /// Cache TTL in seconds.
    pub cache_ttl_secs: u64,
    /// Maximum cached queries.
    pub cache_max_entries: usize,
    /// Results per page when the caller does not choose.
    pub default_page_size: u32,
    /// Bind address for the HTTP server.
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: 30,
            min_interval_ms: DEFAULT_MIN_INTERVAL.as_millis() as u64,
            backoff_base_ms: DEFAULT_BACKOFF_BASE.as_millis() as u64,
            max_retries: DEFAULT_MAX_RETRIES,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            default_page_size: DEFAULT_PAGE_SIZE,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn backoff_config(&self) -> BackoffConfig {
        BackoffConfig {
            min_interval: Duration::from_millis(self.min_interval_ms),
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            max_retries: self.max_retries,
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            default_ttl: Duration::from_secs(self.cache_ttl_secs),
            max_entries: self.cache_max_entries,
        }
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message,
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(())
    }

    /// Apply `PNCP_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Some(url) = env_string("PNCP_BASE_URL") {
            tracing::debug!("Using PNCP_BASE_URL from environment: {}", url);
            self.base_url = url;
        }
        if let Some(ms) = env_parse("PNCP_MIN_INTERVAL_MS") {
            self.min_interval_ms = ms;
        }
        if let Some(ms) = env_parse("PNCP_BACKOFF_BASE_MS") {
            self.backoff_base_ms = ms;
        }
        if let Some(retries) = env_parse("PNCP_MAX_RETRIES") {
            self.max_retries = retries;
        }
        if let Some(secs) = env_parse("PNCP_CACHE_TTL_SECS") {
            self.cache_ttl_secs = secs;
        }
        if let Some(entries) = env_parse("PNCP_CACHE_MAX_ENTRIES") {
            self.cache_max_entries = entries;
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={}", name, raw);
            None
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_base_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_max_entries: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file path.
    /// Format is chosen by extension: TOML, YAML, otherwise JSON.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Find a config file: `./licitacoes.toml`, then
    /// `<config dir>/licitacoes/config.toml`.
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILENAME);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("licitacoes").join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.base_url {
            settings.base_url = url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ms) = self.min_interval_ms {
            settings.min_interval_ms = ms;
        }
        if let Some(ms) = self.backoff_base_ms {
            settings.backoff_base_ms = ms;
        }
        if let Some(retries) = self.max_retries {
            settings.max_retries = retries;
        }
        if let Some(secs) = self.cache_ttl_secs {
            settings.cache_ttl_secs = secs;
        }
        if let Some(entries) = self.cache_max_entries {
            settings.cache_max_entries = entries;
        }
        if let Some(size) = self.default_page_size {
            settings.default_page_size = size;
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
    }
}

/// Options controlling where settings come from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file. Skips discovery when set.
    pub config_path: Option<PathBuf>,
    /// Skip `PNCP_*` environment overrides.
    pub ignore_env: bool,
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub fn load_settings_with_options(options: LoadOptions) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path.or_else(Config::discover) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            Config::load_from_path(&path)?
        }
        None => Config::default(),
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    if !options.ignore_env {
        settings.apply_env();
    }
    settings.validate()?;

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_upstream_constraints() {
        let settings = Settings::default();
        let backoff = settings.backoff_config();
        assert_eq!(backoff.min_interval, Duration::from_secs(5));
        assert_eq!(backoff.backoff_base, Duration::from_secs(15));
        assert_eq!(backoff.max_retries, 1);
        assert_eq!(settings.cache_config().default_ttl, Duration::from_secs(300));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "licitacoes.toml",
            "base_url = \"http://localhost:9000/search\"\nmax_retries = 3\ncache_ttl_secs = 60\n",
        );

        let (settings, config) = load_settings_with_options(LoadOptions {
            config_path: Some(path.clone()),
            ignore_env: true,
        })
        .unwrap();

        assert_eq!(config.source_path, Some(path));
        assert_eq!(settings.base_url, "http://localhost:9000/search");
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.cache_ttl_secs, 60);
        assert_eq!(settings.min_interval_ms, 5000);
    }

    #[test]
    fn test_load_yaml_and_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write_config(dir.path(), "c.yaml", "default_page_size: 25\n");
        let json = write_config(dir.path(), "c.json", r#"{"bind": "0.0.0.0:8080"}"#);

        assert_eq!(
            Config::load_from_path(&yaml).unwrap().default_page_size,
            Some(25)
        );
        assert_eq!(
            Config::load_from_path(&json).unwrap().bind.as_deref(),
            Some("0.0.0.0:8080")
        );
    }

    #[test]
    fn test_parse_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "bad.toml", "max_retries = \"many\"");

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let settings = Settings {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
