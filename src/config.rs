use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub weather: WeatherConfig,

    pub history: HistoryConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/nimbus.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    /// Externally visible origin used to build pagination links.
    pub public_url: String,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8000,
            public_url: "http://localhost:8000".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the provider; `current.json` is appended to it.
    pub api_url: String,

    pub api_key: String,

    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,

    /// How long a normalized snapshot stays cached (default: 30)
    pub cache_ttl_minutes: i64,

    /// Interval of the background sweep that drops expired cache entries.
    pub cache_sweep_interval_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.weatherapi.com/v1".to_string(),
            api_key: String::new(),
            request_timeout_seconds: 10,
            cache_ttl_minutes: crate::constants::cache::WEATHER_TTL_MINUTES,
            cache_sweep_interval_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Rows kept per user once a new search has been recorded.
    pub max_entries: u64,

    /// Attempts per history job before it is dead-lettered.
    pub max_attempts: u32,

    /// Upper bound for a single attempt.
    pub attempt_timeout_seconds: u64,

    /// Pending jobs buffered before new ones are dropped.
    pub queue_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: crate::constants::history::MAX_ENTRIES_PER_USER,
            max_attempts: crate::constants::history::MAX_ATTEMPTS,
            attempt_timeout_seconds: crate::constants::history::ATTEMPT_TIMEOUT_SECONDS,
            queue_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Role assigned to self-registered accounts.
    pub default_role: String,

    pub bootstrap: BootstrapConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            default_role: "user".to_string(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

/// Administrator account created on startup when no user holds that email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub enabled: bool,

    pub admin_name: String,

    pub admin_email: String,

    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_name: "Administrator".to_string(),
            admin_email: "admin@nimbus.local".to_string(),
            admin_password: "change-me-now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Secrets are usually provisioned through the environment (or `.env`)
    /// rather than committed to `config.toml`.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("NIMBUS_WEATHER_API_KEY")
            && !key.is_empty()
        {
            self.weather.api_key = key;
        }

        if let Ok(url) = std::env::var("NIMBUS_DATABASE_URL")
            && !url.is_empty()
        {
            self.general.database_path = url;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("nimbus").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".nimbus").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.weather.api_url.is_empty() {
            anyhow::bail!("Weather API URL cannot be empty");
        }

        if self.weather.cache_ttl_minutes <= 0 {
            anyhow::bail!("Weather cache TTL must be > 0 minutes");
        }

        if self.weather.cache_sweep_interval_seconds == 0 {
            anyhow::bail!("Weather cache sweep interval must be > 0 seconds");
        }

        if self.history.attempt_timeout_seconds == 0 {
            anyhow::bail!("History attempt_timeout_seconds must be > 0");
        }

        if self.history.max_entries == 0 {
            anyhow::bail!("History max_entries must be > 0");
        }

        if self.history.max_attempts == 0 {
            anyhow::bail!("History max_attempts must be > 0");
        }

        if self.history.queue_capacity == 0 {
            anyhow::bail!("History queue_capacity must be > 0");
        }

        if self.security.default_role.is_empty() {
            anyhow::bail!("Default role cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.weather.cache_ttl_minutes, 30);
        assert_eq!(config.history.max_entries, 5);
        assert_eq!(config.history.max_attempts, 3);
        assert_eq!(config.history.attempt_timeout_seconds, 60);
        assert_eq!(config.security.default_role, "user");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[weather]"));
        assert!(toml_str.contains("[history]"));
        assert!(toml_str.contains("[security.bootstrap]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [weather]
            api_key = "abc123"
            cache_ttl_minutes = 10
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.weather.api_key, "abc123");
        assert_eq!(config.weather.cache_ttl_minutes, 10);

        assert_eq!(config.history.max_entries, 5);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.weather.cache_ttl_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.history.max_attempts = 0;
        assert!(config.validate().is_err());
    }
}
