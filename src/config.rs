use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default session-name pattern: three or more colon-separated segments of
/// letters, digits and hyphens, with single underscores allowed between them.
pub const DEFAULT_SESSION_PATTERN: &str =
    r"^[A-Za-z0-9-]+(?:_[A-Za-z0-9-]+)*(?::[A-Za-z0-9-]+(?:_[A-Za-z0-9-]+)*){2,}$";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThoughtlogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub sessions_dir: String,
    pub session_pattern: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Default page size for `view_session` and list operations.
    pub max_return: usize,
    pub preview_chars: usize,
    pub chain_preview_chars: usize,
    /// How many supporting/contradicting thoughts to surface on `builds_on`.
    pub related_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub max_age_days: u64,
}

impl Default for ThoughtlogConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            retrieval: RetrievalConfig::default(),
            maintenance: MaintenanceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let sessions_dir = default_thoughtlog_dir()
            .join("sessions")
            .to_string_lossy()
            .into_owned();
        Self {
            sessions_dir,
            session_pattern: DEFAULT_SESSION_PATTERN.into(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_return: 50,
            preview_chars: 200,
            chain_preview_chars: 150,
            related_limit: 3,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self { max_age_days: 90 }
    }
}

/// Returns `~/.thoughtlog/`, or `./.thoughtlog/` when no home directory is known.
pub fn default_thoughtlog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".thoughtlog")
}

/// Returns the default config file path: `~/.thoughtlog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_thoughtlog_dir().join("config.toml")
}

impl ThoughtlogConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ThoughtlogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (THOUGHTLOG_DIR, THOUGHTLOG_SESSION_PATTERN,
    /// THOUGHTLOG_MAX_RETURN, THOUGHTLOG_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("THOUGHTLOG_DIR") {
            self.storage.sessions_dir = val;
        }
        if let Ok(val) = std::env::var("THOUGHTLOG_SESSION_PATTERN") {
            self.storage.session_pattern = val;
        }
        if let Some(val) = std::env::var("THOUGHTLOG_MAX_RETURN")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.retrieval.max_return = val;
        }
        if let Ok(val) = std::env::var("THOUGHTLOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the sessions directory, expanding `~` if needed.
    pub fn resolved_sessions_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.sessions_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ThoughtlogConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.retrieval.max_return, 50);
        assert_eq!(config.maintenance.max_age_days, 90);
        assert_eq!(config.storage.session_pattern, DEFAULT_SESSION_PATTERN);
        assert!(config.storage.sessions_dir.ends_with("sessions"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"

[storage]
sessions_dir = "/tmp/thoughts"

[retrieval]
max_return = 10
"#;
        let config: ThoughtlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.sessions_dir, "/tmp/thoughts");
        assert_eq!(config.retrieval.max_return, 10);
        // defaults still apply for unset fields
        assert_eq!(config.retrieval.preview_chars, 200);
        assert_eq!(config.storage.session_pattern, DEFAULT_SESSION_PATTERN);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = ThoughtlogConfig::default();
        std::env::set_var("THOUGHTLOG_DIR", "/tmp/override");
        std::env::set_var("THOUGHTLOG_MAX_RETURN", "7");
        std::env::set_var("THOUGHTLOG_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.sessions_dir, "/tmp/override");
        assert_eq!(config.retrieval.max_return, 7);
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("THOUGHTLOG_DIR");
        std::env::remove_var("THOUGHTLOG_MAX_RETURN");
        std::env::remove_var("THOUGHTLOG_LOG_LEVEL");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/data"), PathBuf::from("/var/data"));
    }
}
