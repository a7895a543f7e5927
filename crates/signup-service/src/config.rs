//! Configuration for the sign-up service.

use crate::credentials::{MAX_BCRYPT_COST, MAX_PASSWORD_BYTES, MIN_BCRYPT_COST};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Account storage configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Password policy and hashing configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Shared secret that grants the ADMIN role at sign-up.
    /// Read from `ADMIN_REGISTRATION_KEY`; admin sign-up is disabled when unset.
    #[serde(default)]
    pub admin_registration_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storefront origin allowed to call the API (CORS)
    #[serde(default)]
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the account document
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, accounts are in-memory only)
    #[serde(default = "default_true")]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// bcrypt cost factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Upper bound on password length, in bytes (at most 72)
    #[serde(default = "default_max_password_length")]
    pub max_password_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            frontend_url: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            persist: true,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
            max_password_length: default_max_password_length(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/accounts.json")
}

fn default_true() -> bool {
    true
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_max_password_length() -> usize {
    MAX_PASSWORD_BYTES
}

fn default_global_rpm() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("store", &self.store)
            .field("security", &self.security)
            .field("rate_limit", &self.rate_limit)
            .field("log", &self.log)
            .field(
                "admin_registration_key",
                &self.admin_registration_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Build configuration from an arbitrary source.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// The configured elevation secret, if admin sign-up is enabled.
    ///
    /// An empty value counts as unset.
    pub fn elevation_secret(&self) -> Option<SecretString> {
        self.admin_registration_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::new(key.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.security.bcrypt_cost) {
            anyhow::bail!(
                "security.bcrypt_cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
                self.security.bcrypt_cost
            );
        }
        if !(crate::registration::MIN_PASSWORD_LENGTH..=MAX_PASSWORD_BYTES)
            .contains(&self.security.max_password_length)
        {
            anyhow::bail!(
                "security.max_password_length must be between {} and {}, got {}",
                crate::registration::MIN_PASSWORD_LENGTH,
                MAX_PASSWORD_BYTES,
                self.security.max_password_length
            );
        }
        if !matches!(self.log.format.as_str(), "text" | "json") {
            anyhow::bail!("log.format must be \"text\" or \"json\", got {:?}", self.log.format);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default()
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_source(env(&[])).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert!(config.server.frontend_url.is_none());
        assert_eq!(config.store.path, PathBuf::from("data/accounts.json"));
        assert!(config.store.persist);
        assert_eq!(config.security.bcrypt_cost, 12);
        assert_eq!(config.security.max_password_length, 72);
        assert_eq!(config.rate_limit.global_per_minute, 60);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, "text");
        assert!(config.elevation_secret().is_none());
    }

    #[test]
    fn test_nested_overrides() {
        let config = Config::from_source(env(&[
            ("SERVER__PORT", "9000"),
            ("SERVER__FRONTEND_URL", "http://localhost:5173"),
            ("STORE__PERSIST", "false"),
            ("SECURITY__BCRYPT_COST", "10"),
            ("LOG__FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.frontend_url.as_deref(),
            Some("http://localhost:5173")
        );
        assert!(!config.store.persist);
        assert_eq!(config.security.bcrypt_cost, 10);
        assert_eq!(config.log.format, "json");
    }

    #[test]
    fn test_admin_registration_key() {
        let config = Config::from_source(env(&[("ADMIN_REGISTRATION_KEY", "S3cret")])).unwrap();

        let secret = config.elevation_secret().unwrap();
        assert_eq!(secret.expose_secret(), "S3cret");
    }

    #[test]
    fn test_empty_admin_registration_key_is_unset() {
        let config = Config::from_source(env(&[("ADMIN_REGISTRATION_KEY", "")])).unwrap();
        assert!(config.elevation_secret().is_none());
    }

    #[test]
    fn test_debug_redacts_admin_key() {
        let config = Config::from_source(env(&[("ADMIN_REGISTRATION_KEY", "S3cret")])).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("S3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        assert!(Config::from_source(env(&[("SECURITY__BCRYPT_COST", "3")])).is_err());
        assert!(Config::from_source(env(&[("SECURITY__BCRYPT_COST", "32")])).is_err());
    }

    #[test]
    fn test_rejects_password_cap_beyond_bcrypt_input() {
        assert!(Config::from_source(env(&[("SECURITY__MAX_PASSWORD_LENGTH", "73")])).is_err());
        assert!(Config::from_source(env(&[("SECURITY__MAX_PASSWORD_LENGTH", "7")])).is_err());

        let config =
            Config::from_source(env(&[("SECURITY__MAX_PASSWORD_LENGTH", "64")])).unwrap();
        assert_eq!(config.security.max_password_length, 64);
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(Config::from_source(env(&[("LOG__FORMAT", "xml")])).is_err());
    }
}
