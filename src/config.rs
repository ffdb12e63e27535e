//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `STOCKROOM_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::pagination::PaginationLimits;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Listing defaults and bounds
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page_size() -> u32 {
    crate::pagination::DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Bounds for incoming requests. A default above the maximum is capped.
    pub fn limits(&self) -> PaginationLimits {
        let max_page_size = self.max_page_size.max(1);
        PaginationLimits {
            default_page_size: self.default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Userinfo endpoint of the identity provider. Without it every
    /// token is rejected.
    #[serde(default)]
    pub userinfo_url: Option<String>,

    /// Fall back to a placeholder guest identity when no user is signed in
    #[serde(default)]
    pub allow_guest: bool,

    #[serde(default = "default_auth_timeout")]
    pub timeout_ms: u64,
}

fn default_auth_timeout() -> u64 {
    5000
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            userinfo_url: None,
            allow_guest: false,
            timeout_ms: default_auth_timeout(),
        }
    }
}

/// Initial inventory data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryConfig {
    pub products_csv: Option<String>,
    pub sales_csv: Option<String>,

    /// Seed the sample catalogue when no CSV is given
    #[serde(default)]
    pub demo_data: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("stockroom").join("config.toml")),
            Some(PathBuf::from("/etc/stockroom/config.toml")),
            Some(PathBuf::from("./stockroom.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("STOCKROOM_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("STOCKROOM_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Pagination overrides
        if let Some(size) = var("STOCKROOM_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            self.pagination.default_page_size = size;
        }
        if let Some(max) = var("STOCKROOM_MAX_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            self.pagination.max_page_size = max;
        }

        // Auth overrides
        if let Some(url) = var("STOCKROOM_AUTH_URL") {
            self.auth.userinfo_url = Some(url);
        }
        if let Some(allow) = var("STOCKROOM_ALLOW_GUEST") {
            self.auth.allow_guest = parse_bool(&allow);
        }

        // Inventory overrides
        if let Some(path) = var("STOCKROOM_PRODUCTS_CSV") {
            self.inventory.products_csv = Some(path);
        }
        if let Some(path) = var("STOCKROOM_SALES_CSV") {
            self.inventory.sales_csv = Some(path);
        }

        // Logging overrides
        if let Some(level) = var("STOCKROOM_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("STOCKROOM_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Stockroom Configuration
#
# Environment variables override these settings:
# - STOCKROOM_API_HOST, STOCKROOM_API_PORT
# - STOCKROOM_PAGE_SIZE, STOCKROOM_MAX_PAGE_SIZE
# - STOCKROOM_AUTH_URL, STOCKROOM_ALLOW_GUEST
# - STOCKROOM_PRODUCTS_CSV, STOCKROOM_SALES_CSV
# - STOCKROOM_LOG_LEVEL, STOCKROOM_LOG_FORMAT

[api]
host = "0.0.0.0"
port = 8090

# Allowed CORS origins (empty = allow any)
cors_origins = []

[pagination]
# Page size when a request does not give one
default_page_size = 10

# Largest page size a request may ask for
max_page_size = 100

[auth]
# Userinfo endpoint used to verify bearer tokens
# userinfo_url = "https://id.example.com/userinfo"

# Serve unauthenticated requests as a placeholder guest user.
# Only for demos and local development.
allow_guest = false

# Identity provider request timeout (ms)
timeout_ms = 5000

[inventory]
# products_csv = "./data/products.csv"
# sales_csv = "./data/sales.csv"

# Load the sample catalogue when no CSV is configured
demo_data = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.pagination.default_page_size, 10);
        assert!(!config.auth.allow_guest);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.pagination.max_page_size, 100);
        assert!(config.auth.userinfo_url.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("[pagination]\nmax_page_size = 50\n").unwrap();
        assert_eq!(config.pagination.max_page_size, 50);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 9999\n[auth]\nallow_guest = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9999);
        assert!(config.auth.allow_guest);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load(Path::new("/nonexistent/stockroom.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STOCKROOM_API_PORT", "7000"),
            ("STOCKROOM_PAGE_SIZE", "25"),
            ("STOCKROOM_ALLOW_GUEST", "yes"),
            ("STOCKROOM_AUTH_URL", "http://id.local/userinfo"),
            ("STOCKROOM_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 7000);
        assert_eq!(config.pagination.default_page_size, 25);
        assert!(config.auth.allow_guest);
        assert_eq!(config.auth.userinfo_url.as_deref(), Some("http://id.local/userinfo"));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_limits_cap_default() {
        let pagination = PaginationConfig {
            default_page_size: 500,
            max_page_size: 50,
        };
        let limits = pagination.limits();
        assert_eq!(limits.default_page_size, 50);
        assert_eq!(limits.max_page_size, 50);
    }
}
