//! Configuration management.
//!
//! Configuration is read from a TOML file and overridden by environment
//! variables prefixed with `ARXIV_SEARCH`, using `__` between sections:
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8000"
//! strategy = "unified"        # unified | reranked | by_id
//! timeout_secs = 30
//! search_limit = 20           # optional, backend default when absent
//!
//! [render]
//! abstract_chars = 300
//!
//! [filters]
//! recent_years = [2, 5]
//! ```
//!
//! ```bash
//! export ARXIV_SEARCH_BACKEND__BASE_URL="https://search.example.org"
//! export ARXIV_SEARCH_BACKEND__STRATEGY="reranked"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::BackendStrategy;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ARXIV_SEARCH";

/// File name looked up by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "arxiv-search.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Result rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Filter selector settings
    #[serde(default)]
    pub filters: FilterConfig,
}

impl Config {
    /// Serialize as pretty TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Search backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the endpoint paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint shape to use
    #[serde(default)]
    pub strategy: BackendStrategy,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Result limit forwarded to the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_limit: Option<usize>,
}

impl BackendConfig {
    /// Per-request timeout, at least one millisecond
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs).max(Duration::from_millis(1))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            strategy: BackendStrategy::default(),
            timeout_secs: default_timeout_secs(),
            search_limit: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Characters of abstract shown before the ellipsis
    #[serde(default = "default_abstract_chars")]
    pub abstract_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            abstract_chars: default_abstract_chars(),
        }
    }
}

fn default_abstract_chars() -> usize {
    300
}

/// Filter selector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// "Last N years" windows offered besides "All years" and "This year"
    #[serde(default = "default_recent_years")]
    pub recent_years: Vec<u32>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            recent_years: default_recent_years(),
        }
    }
}

fn default_recent_years() -> Vec<u32> {
    vec![2, 5]
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

/// Configuration from defaults and environment overrides only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("filters.recent_years")
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_in(&cwd, dirs::config_dir().as_deref())
}

fn find_config_file_in(cwd: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    config_dir
        .map(|dir| dir.join("arxiv-search").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tempfile::tempdir;

    /// Serializes tests that read `ARXIV_SEARCH_*` variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.strategy, BackendStrategy::Unified);
        assert_eq!(config.backend.timeout(), Duration::from_secs(30));
        assert_eq!(config.render.abstract_chars, 300);
        assert_eq!(config.filters.recent_years, vec![2, 5]);
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[backend]
base_url = "https://search.example.org/api"
strategy = "by_id"
timeout_secs = 5
search_limit = 15

[render]
abstract_chars = 120

[filters]
recent_years = [3]
"#;
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let _env = env_lock();
        let config = load_config(&path).unwrap();
        assert_eq!(config.backend.base_url, "https://search.example.org/api");
        assert_eq!(config.backend.strategy, BackendStrategy::ById);
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert_eq!(config.backend.search_limit, Some(15));
        assert_eq!(config.render.abstract_chars, 120);
        assert_eq!(config.filters.recent_years, vec![3]);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[render]\nabstract_chars = 80\n").unwrap();

        let _env = env_lock();
        let config = load_config(&path).unwrap();
        assert_eq!(config.render.abstract_chars, 80);
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        let _env = env_lock();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nbase_url = \"https://file.example.org\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let _env = env_lock();
        let vars = [
            ("ARXIV_SEARCH_BACKEND__BASE_URL", "https://env.example.org"),
            ("ARXIV_SEARCH_BACKEND__STRATEGY", "reranked"),
            ("ARXIV_SEARCH_BACKEND__SEARCH_LIMIT", "40"),
            ("ARXIV_SEARCH_FILTERS__RECENT_YEARS", "3,10"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let from_file = load_config(&path);
        let from_env = get_config();

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = from_file.unwrap();
        assert_eq!(config.backend.base_url, "https://env.example.org");
        assert_eq!(config.backend.strategy, BackendStrategy::Reranked);
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.backend.search_limit, Some(40));
        assert_eq!(config.filters.recent_years, vec![3, 10]);

        let config = from_env.unwrap();
        assert_eq!(config.backend.base_url, "https://env.example.org");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_find_config_file_prefers_working_directory() {
        let cwd = tempdir().unwrap();
        let config_dir = tempdir().unwrap();
        assert_eq!(find_config_file_in(cwd.path(), Some(config_dir.path())), None);

        let user = config_dir.path().join("arxiv-search").join("config.toml");
        std::fs::create_dir_all(user.parent().unwrap()).unwrap();
        std::fs::write(&user, "").unwrap();
        assert_eq!(
            find_config_file_in(cwd.path(), Some(config_dir.path())),
            Some(user)
        );

        let local = cwd.path().join(CONFIG_FILE_NAME);
        std::fs::write(&local, "").unwrap();
        assert_eq!(
            find_config_file_in(cwd.path(), Some(config_dir.path())),
            Some(local)
        );
        assert_eq!(find_config_file_in(config_dir.path(), None), None);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = BackendConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.timeout() > Duration::ZERO);
    }

    #[test]
    fn test_to_toml_round_trip() {
        let mut config = Config::default();
        config.backend.search_limit = Some(10);

        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
