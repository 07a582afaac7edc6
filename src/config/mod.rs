//! Configuration management
//!
//! This module handles loading and parsing configuration for the admin console client.
//! Configuration can be loaded from:
//! - admin-console.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::ApiMode;

/// Fallback backend address used when no base URL was injected at deploy time
pub const DEFAULT_BASE_URL: &str = "https://demo-fast-backend.ktovoz.com";

/// Values accepted as "on" for boolean environment switches
const TRUTHY_VALUES: [&str; 4] = ["true", "1", "yes", "on"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Mock backend configuration
    #[serde(default)]
    pub mock: MockConfig,
    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (mock backend on by default)
    #[default]
    Development,
    /// Production deployment
    Production,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, e.g. `https://api.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix appended to the origin
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Rewrite `http://` origins to `https://` (hosting page is served over HTTPS)
    #[serde(default)]
    pub force_https: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix: default_prefix(),
            timeout_ms: default_timeout_ms(),
            force_https: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_prefix() -> String {
    "/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Mock backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Force the mock backend on or off; `None` follows the environment
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Simulated response latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            latency_ms: default_latency_ms(),
        }
    }
}

fn default_latency_ms() -> u64 {
    300
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the durable session record
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Session schema version; bump to invalidate stored sessions
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            schema_version: default_schema_version(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_schema_version() -> String {
    "1".to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - ADMIN_CONSOLE_ENV
    /// - ADMIN_CONSOLE_API_BASE_URL
    /// - ADMIN_CONSOLE_API_PREFIX
    /// - ADMIN_CONSOLE_API_TIMEOUT_MS
    /// - ADMIN_CONSOLE_FORCE_HTTPS
    /// - ADMIN_CONSOLE_USE_MOCK
    /// - ADMIN_CONSOLE_MOCK_LATENCY_MS
    /// - ADMIN_CONSOLE_DATA_DIR
    /// - ADMIN_CONSOLE_SESSION_VERSION
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(env) = std::env::var("ADMIN_CONSOLE_ENV") {
            match env.to_lowercase().as_str() {
                "development" | "dev" => self.environment = Environment::Development,
                "production" | "prod" => self.environment = Environment::Production,
                _ => {} // Ignore invalid values
            }
        }

        // API configuration
        if let Ok(base_url) = std::env::var("ADMIN_CONSOLE_API_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(prefix) = std::env::var("ADMIN_CONSOLE_API_PREFIX") {
            self.api.prefix = prefix;
        }
        if let Ok(timeout) = std::env::var("ADMIN_CONSOLE_API_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.api.timeout_ms = timeout;
            }
        }
        if let Ok(force_https) = std::env::var("ADMIN_CONSOLE_FORCE_HTTPS") {
            self.api.force_https = is_truthy(&force_https);
        }

        // Mock configuration
        if let Ok(use_mock) = std::env::var("ADMIN_CONSOLE_USE_MOCK") {
            self.mock.enabled = Some(is_truthy(&use_mock));
        }
        if let Ok(latency) = std::env::var("ADMIN_CONSOLE_MOCK_LATENCY_MS") {
            if let Ok(latency) = latency.parse::<u64>() {
                self.mock.latency_ms = latency;
            }
        }

        // Session configuration
        if let Ok(data_dir) = std::env::var("ADMIN_CONSOLE_DATA_DIR") {
            self.session.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(version) = std::env::var("ADMIN_CONSOLE_SESSION_VERSION") {
            self.session.schema_version = version;
        }
    }

    /// Which backend the API modules talk to
    pub fn api_mode(&self) -> ApiMode {
        let enabled = self
            .mock
            .enabled
            .unwrap_or(self.environment == Environment::Development);
        if enabled {
            ApiMode::Mock
        } else {
            ApiMode::Http
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    /// Simulated mock backend latency
    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock.latency_ms)
    }

    /// Resolve the final API base URL
    ///
    /// Unset or unreplaced `${...}` placeholders fall back to [`DEFAULT_BASE_URL`].
    /// The configured prefix is appended with exactly one separating slash.
    pub fn resolve_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api.base_url.trim();
        let mut origin = if raw.is_empty() || raw.contains("${") {
            tracing::debug!("API base URL unset or still a placeholder, using default");
            DEFAULT_BASE_URL.to_string()
        } else {
            raw.to_string()
        };

        if self.api.force_https {
            if let Some(rest) = origin.strip_prefix("http://") {
                tracing::debug!("Forcing HTTPS for API base URL");
                origin = format!("https://{}", rest);
            }
        }

        let joined = join_url(&origin, self.api.prefix.trim_matches('/'));
        let url = Url::parse(&joined).map_err(|e| {
            ConfigError::ValidationError(format!("malformed API base URL '{}': {}", joined, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "unsupported API base URL scheme '{}'",
                url.scheme()
            )));
        }

        Ok(url)
    }
}

/// Join a base URL and a path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Parse a boolean switch the way the deployment tooling writes them
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY_VALUES.contains(&value.as_str())
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    const ENV_KEYS: [&str; 9] = [
        "ADMIN_CONSOLE_ENV",
        "ADMIN_CONSOLE_API_BASE_URL",
        "ADMIN_CONSOLE_API_PREFIX",
        "ADMIN_CONSOLE_API_TIMEOUT_MS",
        "ADMIN_CONSOLE_FORCE_HTTPS",
        "ADMIN_CONSOLE_USE_MOCK",
        "ADMIN_CONSOLE_MOCK_LATENCY_MS",
        "ADMIN_CONSOLE_DATA_DIR",
        "ADMIN_CONSOLE_SESSION_VERSION",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_admin_console.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert!(!config.api.force_https);
        assert_eq!(config.mock.enabled, None);
        assert_eq!(config.mock.latency_ms, 300);
        assert_eq!(config.session.data_dir, PathBuf::from("data"));
        assert_eq!(config.session.schema_version, "1");
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.timeout_ms, 10_000);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  timeout_ms: 2500\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.timeout_ms, 2500);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.mock.latency_ms, 300);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"
environment: production
api:
  base_url: "http://backend.internal:8000/"
  prefix: "/api/v2"
  timeout_ms: 5000
  force_https: true
mock:
  enabled: false
  latency_ms: 0
session:
  data_dir: "/var/lib/admin-console"
  schema_version: "2025-10"
"#).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api.base_url, "http://backend.internal:8000/");
        assert_eq!(config.api.prefix, "/api/v2");
        assert_eq!(config.api.timeout_ms, 5000);
        assert!(config.api.force_https);
        assert_eq!(config.mock.enabled, Some(false));
        assert_eq!(config.mock.latency_ms, 0);
        assert_eq!(config.session.data_dir, PathBuf::from("/var/lib/admin-console"));
        assert_eq!(config.session.schema_version, "2025-10");
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  timeout_ms: soon\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_api_mode_follows_environment() {
        let mut config = Config::default();
        assert_eq!(config.api_mode(), ApiMode::Mock);

        config.environment = Environment::Production;
        assert_eq!(config.api_mode(), ApiMode::Http);

        config.mock.enabled = Some(true);
        assert_eq!(config.api_mode(), ApiMode::Mock);

        config.environment = Environment::Development;
        config.mock.enabled = Some(false);
        assert_eq!(config.api_mode(), ApiMode::Http);
    }

    #[test]
    fn test_is_truthy() {
        for value in ["true", "TRUE", "1", "yes", "On", " on "] {
            assert!(is_truthy(value), "{value} should be truthy");
        }
        for value in ["false", "0", "no", "off", "", "enabled"] {
            assert!(!is_truthy(value), "{value} should not be truthy");
        }
    }

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(join_url("https://a.io/api/", "/users"), "https://a.io/api/users");
        assert_eq!(join_url("https://a.io/api", "users"), "https://a.io/api/users");
        assert_eq!(join_url("https://a.io/api//", "//users/1"), "https://a.io/api/users/1");
        assert_eq!(join_url("https://a.io/api", ""), "https://a.io/api");
    }

    #[test]
    fn test_resolve_base_url_default_and_placeholder() {
        let mut config = Config::default();
        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "https://demo-fast-backend.ktovoz.com/api"
        );

        config.api.base_url = "${VITE_API_BASE_URL}".to_string();
        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "https://demo-fast-backend.ktovoz.com/api"
        );

        config.api.base_url = String::new();
        assert!(config.resolve_base_url().unwrap().as_str().starts_with(DEFAULT_BASE_URL));
    }

    #[test]
    fn test_resolve_base_url_forces_https() {
        let mut config = Config::default();
        config.api.base_url = "http://backend.local:8000/".to_string();

        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "http://backend.local:8000/api"
        );

        config.api.force_https = true;
        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "https://backend.local:8000/api"
        );
    }

    #[test]
    fn test_resolve_base_url_rejects_malformed() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(
            config.resolve_base_url(),
            Err(ConfigError::ValidationError(_))
        ));

        config.api.base_url = "ftp://files.example.com".to_string();
        assert!(matches!(
            config.resolve_base_url(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("ADMIN_CONSOLE_ENV", "production");
        std::env::set_var("ADMIN_CONSOLE_API_BASE_URL", "https://env.example.com");
        std::env::set_var("ADMIN_CONSOLE_API_TIMEOUT_MS", "1234");
        std::env::set_var("ADMIN_CONSOLE_USE_MOCK", "yes");
        std::env::set_var("ADMIN_CONSOLE_MOCK_LATENCY_MS", "0");
        std::env::set_var("ADMIN_CONSOLE_DATA_DIR", "/tmp/console");
        std::env::set_var("ADMIN_CONSOLE_SESSION_VERSION", "7");

        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        clear_env();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.api.timeout_ms, 1234);
        assert_eq!(config.mock.enabled, Some(true));
        assert_eq!(config.api_mode(), ApiMode::Mock);
        assert_eq!(config.mock.latency_ms, 0);
        assert_eq!(config.session.data_dir, PathBuf::from("/tmp/console"));
        assert_eq!(config.session.schema_version, "7");
    }

    #[test]
    fn test_env_override_invalid_values_ignored() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("ADMIN_CONSOLE_ENV", "staging");
        std::env::set_var("ADMIN_CONSOLE_API_TIMEOUT_MS", "fast");
        std::env::set_var("ADMIN_CONSOLE_USE_MOCK", "maybe");

        let config = Config::load_with_env(std::path::Path::new("nonexistent.yml")).unwrap();
        clear_env();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api.timeout_ms, 10_000);
        // Anything outside the truthy set switches the mock off
        assert_eq!(config.mock.enabled, Some(false));
    }

    #[test]
    fn test_env_override_wins_over_file() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api:\n  base_url: \"https://file.example.com\"\n").unwrap();
        std::env::set_var("ADMIN_CONSOLE_API_BASE_URL", "https://env.example.com");

        let config = Config::load_with_env(file.path()).unwrap();
        clear_env();

        assert_eq!(config.api.base_url, "https://env.example.com");
    }
}
