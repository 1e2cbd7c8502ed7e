//! User configuration.
//!
//! Loaded once from `~/.sk/config.toml`, then overridden from the environment,
//! and handed to every component that needs it. Nothing here is global.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::DEFAULT_API_URL as DEFAULT_GITHUB_API_URL;
use crate::paths;

/// Registry used when `registry` is empty or set to the `github` sentinel.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/majiayu000/claude-skill-registry/main";

const REGISTRY_SENTINEL: &str = "github";

/// Reading or writing `config.toml` failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`Config`].
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Effective configuration for the core components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the local content store; one directory per skill.
    pub skills_dir: PathBuf,
    /// Registry base URL, or `github` for the default registry.
    pub registry: String,
    /// Maximum age of the cached catalog before it is ignored.
    pub registry_ttl_hours: u64,
    /// Per-request timeout for registry and archive downloads.
    pub http_timeout_secs: u64,
    /// GitHub API base for repository search.
    pub github_api: String,
    /// Override for the cached catalog location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skills_dir: paths::default_skills_dir(),
            registry: REGISTRY_SENTINEL.to_string(),
            registry_ttl_hours: 24,
            http_timeout_secs: 10,
            github_api: DEFAULT_GITHUB_API_URL.to_string(),
            cache_path: None,
        }
    }
}

impl Config {
    /// Load `~/.sk/config.toml` and apply environment overrides.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// reported with a warning and also yields defaults.
    pub fn load() -> Self {
        let path = paths::config_path();
        let mut config = match Self::load_from(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {e}", path.display());
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Read a config file. Returns `Ok(None)` if it does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(toml::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the configuration to `~/.sk/config.toml`.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&paths::config_path())
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("SK_SKILLS_DIR") {
            if !dir.is_empty() {
                self.skills_dir = PathBuf::from(dir);
            }
        }
        if let Ok(url) = std::env::var("SK_REGISTRY_URL") {
            if !url.is_empty() {
                self.registry = url;
            }
        }
        if let Ok(url) = std::env::var("SK_GITHUB_API_URL") {
            if !url.is_empty() {
                self.github_api = url;
            }
        }
    }

    /// Registry base URL with the sentinel resolved and no trailing slash.
    pub fn registry_base_url(&self) -> String {
        let base = self.registry.trim();
        if base.is_empty() || base == REGISTRY_SENTINEL {
            DEFAULT_REGISTRY_URL.to_string()
        } else {
            base.trim_end_matches('/').to_string()
        }
    }

    /// GitHub API base with no trailing slash.
    pub fn github_api_url(&self) -> String {
        let base = self.github_api.trim();
        if base.is_empty() {
            DEFAULT_GITHUB_API_URL.to_string()
        } else {
            base.trim_end_matches('/').to_string()
        }
    }

    /// Cache freshness window.
    pub fn registry_ttl(&self) -> Duration {
        Duration::from_secs(self.registry_ttl_hours.saturating_mul(3600))
    }

    /// Network timeout applied to each request.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Where the catalog cache is written.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(paths::registry_cache_path)
    }
}
