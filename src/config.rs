//! Configuration for the godsaeng store
//!
//! Two decisions are made here, once, at store construction:
//! 1. whether a relational database is configured (remote mode) or the
//!    key-value fallback should be used (local mode), and
//! 2. where local-mode data lives on disk.
//!
//! Data directory precedence:
//! 1. GODSAENG_DATA_DIR environment variable
//! 2. $HOME/.config/godsaeng/data
//! 3. ./data (fallback for development)

use std::path::PathBuf;

const ENV_DATABASE_URL: &str = "GODSAENG_DATABASE_URL";
const ENV_DATA_DIR: &str = "GODSAENG_DATA_DIR";

const DEFAULT_CONFIG_DIR: &str = ".config/godsaeng/data";
const DEV_DATA_DIR: &str = "./data";

/// Scaffold values that ship in example env files. A URL equal to one of
/// these means "not configured", exactly like an empty string.
const PLACEHOLDER_URLS: &[&str] = &[
    "sqlite:your-database.db",
    "postgres://your-project.example.com/godsaeng",
];

/// Returns true if `url` names a real database rather than a scaffold
/// placeholder.
pub fn is_configured_url(url: &str) -> bool {
    !url.trim().is_empty() && !PLACEHOLDER_URLS.contains(&url)
}

/// Storage configuration. Built once at process start; the backend choice
/// derived from it never changes during the process lifetime.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    database_url: Option<String>,
    data_dir: PathBuf,
}

impl StorageConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var(ENV_DATABASE_URL).ok(),
            data_dir: data_dir_from_env(),
        }
    }

    /// Local-only configuration rooted at `data_dir`. Used by tests and by
    /// deployments that never configure a database.
    pub fn local(data_dir: PathBuf) -> Self {
        Self {
            database_url: None,
            data_dir,
        }
    }

    /// Configuration with an explicit database URL.
    pub fn with_database_url(url: impl Into<String>, data_dir: PathBuf) -> Self {
        Self {
            database_url: Some(url.into()),
            data_dir,
        }
    }

    /// The configured database URL, or `None` when it is absent, empty, or
    /// a known placeholder.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| is_configured_url(url))
    }

    /// Whether the relational backend will be selected.
    pub fn remote_configured(&self) -> bool {
        self.database_url().is_some()
    }

    /// Directory for local-mode data.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}

fn data_dir_from_env() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_not_configured() {
        assert!(!is_configured_url(""));
        assert!(!is_configured_url("   "));
    }

    #[test]
    fn placeholders_are_not_configured() {
        assert!(!is_configured_url("sqlite:your-database.db"));
        assert!(!is_configured_url("postgres://your-project.example.com/godsaeng"));
    }

    #[test]
    fn real_urls_are_configured() {
        assert!(is_configured_url("sqlite:godsaeng.db"));
        assert!(is_configured_url("sqlite::memory:"));
    }

    #[test]
    fn placeholder_url_selects_local_mode() {
        let config = StorageConfig::with_database_url(
            "sqlite:your-database.db",
            PathBuf::from("./data"),
        );
        assert!(!config.remote_configured());
        assert_eq!(config.database_url(), None);
    }

    #[test]
    fn real_url_selects_remote_mode() {
        let config =
            StorageConfig::with_database_url("sqlite:godsaeng.db", PathBuf::from("./data"));
        assert!(config.remote_configured());
        assert_eq!(config.database_url(), Some("sqlite:godsaeng.db"));
    }

    // Note: env-var reading is not unit-tested to avoid test pollution;
    // the precedence logic mirrors data_dir_from_env line for line.
}
