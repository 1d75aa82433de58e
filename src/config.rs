//! Archive configuration (TOML).
//!
//! Resolution order:
//! 1. Explicit path (`--config`)
//! 2. `CASE_ARCHIVE_CONFIG` environment variable
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};

pub const CONFIG_ENV_VAR: &str = "CASE_ARCHIVE_CONFIG";

/// Published sheet the archive is maintained in, exported as CSV.
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQktlqr_oeJZHXwj1v3Vpzo0GnFIwdRPmh2Zp5s25bmy-QYvvh0SLXr5wXAEKl_x8HcVSjLbc2hDSj3/pub?gid=0&single=true&output=csv";
pub const DEFAULT_STORE_PATH: &str = "case_archive.db";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub source_url: String,
    pub store_path: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("nu_plugin_case_archive/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ArchiveConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ArchiveError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text).map_err(|e| {
            ArchiveError::Config(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Resolve the active configuration. A path that was named explicitly
    /// (flag or environment) must load; only the absence of both falls back
    /// to defaults.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            tracing::debug!(path = %path.display(), "loading config from flag");
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                tracing::debug!(path = %path, "loading config from environment");
                return Self::load(Path::new(&path));
            }
        }

        Ok(Self::default())
    }

    /// Apply per-invocation overrides on top of the loaded file.
    pub fn with_overrides(mut self, source_url: Option<String>, store_path: Option<PathBuf>) -> Self {
        if let Some(url) = source_url {
            self.source_url = url;
        }
        if let Some(path) = store_path {
            self.store_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_published_sheet() {
        let config = ArchiveConfig::default();
        assert!(config.source_url.ends_with("output=csv"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.store_path, PathBuf::from("case_archive.db"));
        assert!(config.user_agent.starts_with("nu_plugin_case_archive/"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ArchiveConfig::from_toml_str("timeout_secs = 5\n").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn full_toml() {
        let config = ArchiveConfig::from_toml_str(
            r#"
            source_url = "http://localhost/cases.csv"
            store_path = "/tmp/archive.db"
            timeout_secs = 10
            user_agent = "test-agent"
            "#,
        )
        .unwrap();
        assert_eq!(config.source_url, "http://localhost/cases.csv");
        assert_eq!(config.store_path, PathBuf::from("/tmp/archive.db"));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(ArchiveConfig::from_toml_str("timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_explicit_path_is_config_error() {
        let err = ArchiveConfig::resolve(Some(Path::new("/nonexistent/archive.toml"))).unwrap_err();
        assert!(matches!(err, ArchiveError::Config(_)));
    }

    #[test]
    fn explicit_path_loads() {
        let path = std::env::temp_dir().join(format!("case_archive_cfg_{}.toml", std::process::id()));
        std::fs::write(&path, "store_path = \"saved.db\"\n").unwrap();
        let config = ArchiveConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.store_path, PathBuf::from("saved.db"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn overrides_win() {
        let config = ArchiveConfig::default()
            .with_overrides(Some("http://x/y.csv".into()), None);
        assert_eq!(config.source_url, "http://x/y.csv");
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }
}
