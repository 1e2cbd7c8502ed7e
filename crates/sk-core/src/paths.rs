//! Filesystem locations under the sk home directory.

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the sk state directory, or None if the user's home cannot be resolved.
pub fn try_sk_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("SK_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".sk"))
}

/// Returns the sk state directory (`~/.sk`), falling back to a relative
/// `.sk` when no home directory can be determined.
pub fn sk_home() -> PathBuf {
    try_sk_home().unwrap_or_else(|| PathBuf::from(".sk"))
}

/// Configuration file: ~/.sk/config.toml
pub fn config_path() -> PathBuf {
    sk_home().join("config.toml")
}

/// `SQLite` install receipts: ~/.sk/state.db
pub fn db_path() -> PathBuf {
    sk_home().join("state.db")
}

/// Cache directory: ~/.sk/cache
pub fn cache_dir() -> PathBuf {
    sk_home().join("cache")
}

/// Cached registry catalog: ~/.sk/cache/registry.json
pub fn registry_cache_path() -> PathBuf {
    cache_dir().join("registry.json")
}

/// Default skills directory: ~/.claude/skills
pub fn default_skills_dir() -> PathBuf {
    home_dir()
        .map(|h| h.join(".claude").join("skills"))
        .unwrap_or_else(|| sk_home().join("skills"))
}
