//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (ABSMETA_*)
//! 2. TOML config file (if ABSMETA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ABSMETA_*)
/// 2. TOML config file (if ABSMETA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interface the HTTP server binds to.
    ///
    /// Set via ABSMETA_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    ///
    /// Set via ABSMETA_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Fallback log filter when RUST_LOG is unset.
    ///
    /// Set via ABSMETA_LOG_LEVEL environment variable.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// User-Agent string for upstream requests.
    ///
    /// Set via ABSMETA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via ABSMETA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read from an upstream response.
    ///
    /// Set via ABSMETA_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Send the DLsite age-verification cookie with every request.
    ///
    /// Set via ABSMETA_DISABLE_AGE_CHECK (accepts 1/true/yes/on).
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub disable_age_check: bool,

    /// Base URL of the DLsite storefront.
    ///
    /// Set via ABSMETA_DLSITE_BASE_URL environment variable.
    #[serde(default = "default_dlsite_base_url")]
    pub dlsite_base_url: String,

    /// Upper bound on cached search results.
    ///
    /// Set via ABSMETA_CACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Interval between background sweeps of expired cache entries.
    ///
    /// Set via ABSMETA_CACHE_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// TTL applied when a provider reports a zero cache lifetime.
    ///
    /// Set via ABSMETA_DEFAULT_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub default_cache_ttl_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_dlsite_base_url() -> String {
    "https://www.dlsite.com".into()
}

fn default_cache_max_entries() -> usize {
    10_000
}

fn default_cache_sweep_interval_secs() -> u64 {
    3600
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

/// Accepts booleans as well as the usual env-var spellings (`1`, `yes`, `on`).
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Str(s) => matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            disable_age_check: false,
            dlsite_base_url: default_dlsite_base_url(),
            cache_max_entries: default_cache_max_entries(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            default_cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sweep interval as Duration.
    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }

    /// Default cache TTL as Duration.
    pub fn default_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.default_cache_ttl_secs)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `ABSMETA_`
    /// 2. TOML file from `ABSMETA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment backing [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ABSMETA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("ABSMETA_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.max_bytes, 5_242_880);
        assert!(!config.disable_age_check);
        assert_eq!(config.dlsite_base_url, "https://www.dlsite.com");
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_sweep_interval_secs, 3600);
        assert_eq!(config.default_cache_ttl_secs, 3600);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_sweep_interval(), Duration::from_secs(3600));
        assert_eq!(config.default_cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("ABSMETA_PORT", "9090");
            jail.set_env("ABSMETA_CACHE_MAX_ENTRIES", "50");
            jail.set_env("ABSMETA_DISABLE_AGE_CHECK", "yes");

            let config = AppConfig::from_figment(AppConfig::figment()).unwrap();
            assert_eq!(config.port, 9090);
            assert_eq!(config.cache_max_entries, 50);
            assert!(config.disable_age_check);
            Ok(())
        });
    }

    #[test]
    fn test_age_check_flag_spellings() {
        for (raw, expected) in [("1", true), ("true", true), ("ON", true), ("0", false), ("no", false)] {
            Jail::expect_with(|jail| {
                jail.set_env("ABSMETA_DISABLE_AGE_CHECK", raw);
                let config = AppConfig::from_figment(AppConfig::figment()).unwrap();
                assert_eq!(config.disable_age_check, expected, "flag value {raw:?}");
                Ok(())
            });
        }
    }

    #[test]
    fn test_toml_file_below_env() {
        Jail::expect_with(|jail| {
            jail.create_file("absmeta.toml", "port = 7000\nlog_level = \"debug\"\n")?;
            jail.set_env("ABSMETA_CONFIG_FILE", "absmeta.toml");
            jail.set_env("ABSMETA_PORT", "7001");

            let config = AppConfig::from_figment(AppConfig::figment()).unwrap();
            assert_eq!(config.port, 7001);
            assert_eq!(config.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_env_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ABSMETA_CACHE_MAX_ENTRIES", "0");
            let result = AppConfig::from_figment(AppConfig::figment());
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_entries"));
            Ok(())
        });
    }
}
