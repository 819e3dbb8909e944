use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use propreg::client::DEFAULT_BASE_URL;
use propreg::search::DEFAULT_PAGE_SIZE;

pub const CONFIG_DIR: &str = ".propreg";
pub const CONFIG_FILE: &str = "config.toml";

/// Project context for propreg commands
pub struct ProjectContext {
    /// Directory holding `.propreg`, or the working directory when none exists
    pub project_root: PathBuf,
    /// Path to .propreg directory
    pub propreg_dir: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Option<PropregConfig>,
}

/// Configuration stored in .propreg/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropregConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub table: TableSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let propreg_dir = project_root.join(CONFIG_DIR);
        let config_path = propreg_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).context("Failed to read config.toml")?;
            let config: PropregConfig = toml::from_str(&content).context("Failed to parse config.toml")?;
            Some(config)
        } else {
            None
        };

        Ok(Self {
            project_root,
            propreg_dir,
            config_path,
            config,
        })
    }

    /// Nearest ancestor holding `.propreg/config.toml`
    fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            if current.join(CONFIG_DIR).join(CONFIG_FILE).exists() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.propreg_dir.exists() && self.config_path.exists()
    }

    /// Backend base URL: the override first, then the config file, then the default.
    pub fn api_url(&self, override_url: Option<&str>) -> Result<String> {
        if let Some(url) = override_url {
            return Ok(url.to_string());
        }
        let url = self
            .config
            .as_ref()
            .map(|c| c.api.url.as_str())
            .unwrap_or(DEFAULT_BASE_URL);
        expand_env(url)
    }

    pub fn timeout(&self) -> Duration {
        let secs = self
            .config
            .as_ref()
            .map(|c| c.api.timeout_secs)
            .unwrap_or_else(default_timeout_secs);
        Duration::from_secs(secs.max(1))
    }

    pub fn page_size(&self) -> usize {
        self.config
            .as_ref()
            .map(|c| c.table.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Expands a value of the form `${VAR}` from the environment.
pub fn expand_env(value: &str) -> Result<String> {
    match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => std::env::var(var_name).with_context(|| format!("Environment variable {var_name} not set")),
        None => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn write_config(dir: &Path, body: &str) {
        let propreg_dir = dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&propreg_dir).unwrap();
        std::fs::write(propreg_dir.join(CONFIG_FILE), body).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = PropregConfig::default();
        assert_eq!(config.api.url, "http://localhost:8089");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.table.page_size, 5);
    }

    #[test]
    fn test_config_serialization() {
        let config = PropregConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("page_size"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[table]\npage_size = 10\n");

        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();
        assert!(ctx.is_initialized());
        assert_eq!(ctx.page_size(), 10);
        assert_eq!(ctx.api_url(None).unwrap(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_find_walks_up_to_config() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[api]\nurl = \"http://registry.test\"\n");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = ProjectContext::find_from(&nested).unwrap();
        assert_eq!(ctx.project_root, dir.path());
        assert_eq!(ctx.api_url(None).unwrap(), "http://registry.test");
        assert_eq!(ctx.api_url(Some("http://override.test")).unwrap(), "http://override.test");
    }

    #[test]
    fn test_missing_config_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::find_from(dir.path()).unwrap();
        assert!(!ctx.is_initialized());
        assert_eq!(ctx.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(ctx.timeout(), Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_env_expansion() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[api]\nurl = \"${PROPREG_TEST_BACKEND}\"\n");
        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();

        unsafe { std::env::set_var("PROPREG_TEST_BACKEND", "http://from-env.test") };
        assert_eq!(ctx.api_url(None).unwrap(), "http://from-env.test");

        unsafe { std::env::remove_var("PROPREG_TEST_BACKEND") };
        assert!(ctx.api_url(None).is_err());
    }

    #[test]
    fn test_literal_values_pass_through() {
        assert_eq!(expand_env("http://plain.test").unwrap(), "http://plain.test");
    }
}
