//! # Client Configuration
//!
//! Configuration management for the roster-client library.
//! Supports environment variables, config files, and explicit construction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dates::DatePolicy;
use crate::error::{ConfigError, ConfigResult};
use crate::lookup::record::ColumnMapping;

/// Top-level configuration for lookups and connectivity
///
/// # Examples
///
/// ```rust
/// use roster_client::config::RosterConfig;
///
/// // Default configuration
/// let config = RosterConfig::default();
/// assert_eq!(config.lookup.timeout_ms, 30000);
/// assert_eq!(config.connectivity.sentinel_path, "diagnostics/connectivity-probe");
/// ```
///
/// ```rust,no_run
/// use roster_client::config::RosterConfig;
///
/// // Load configuration from environment and config files
/// let config = RosterConfig::load().expect("Failed to load config");
/// println!("Directory URL: {}", config.lookup.base_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Worker directory lookup configuration
    pub lookup: LookupEndpointConfig,
    /// Document store connectivity configuration
    pub connectivity: ConnectivityConfig,
}

/// Worker directory endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupEndpointConfig {
    /// Base URL of the directory endpoint. Deployment-specific; empty
    /// means unconfigured and is rejected at client construction.
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Policy for timestamp-shaped entry dates
    pub date_policy: DatePolicy,
    /// Positional column layout of directory rows
    pub columns: ColumnMapping,
}

/// Document store connectivity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Path of the well-known document probes fetch. The document does not
    /// need to exist; only the round trip matters.
    pub sentinel_path: String,
    /// Per-attempt probe timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Retry attempts after the first transient failure
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub retry_base_delay_ms: u64,
    /// Multiplier applied to the delay between consecutive retries. A value
    /// whose product is not representable as a delay (negative, non-finite,
    /// or overflowing) leaves the delay unchanged for that retry.
    pub retry_backoff_multiplier: f64,
}

impl Default for LookupEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 30000,
            date_policy: DatePolicy::default(),
            columns: ColumnMapping::default(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            sentinel_path: "diagnostics/connectivity-probe".to_string(),
            probe_timeout_ms: 30000,
            max_retries: 3,
            retry_base_delay_ms: 2000,
            retry_backoff_multiplier: 2.0,
        }
    }
}

impl RosterConfig {
    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (see [`RosterConfig::default_config_path`])
    /// 3. Default values
    pub fn load() -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            debug!("Loading config from: {}", config_path.display());
            match Self::load_from_file(&config_path) {
                Ok(file_config) => config = file_config,
                Err(e) => {
                    debug!("Failed to load config file: {}", e);
                    // Continue with defaults if config file fails
                }
            }
        }

        config.apply_env_overrides();

        debug!("Loaded roster configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![
            PathBuf::from("./roster-client.toml"),
            PathBuf::from("./config/roster-client.toml"),
        ];
        if let Some(home_dir) = dirs::home_dir() {
            possible_paths.push(home_dir.join(".roster").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            possible_paths.push(config_dir.join("roster").join("client.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Lookup overrides
        if let Ok(url) = std::env::var("ROSTER_LOOKUP_URL") {
            self.lookup.base_url = url;
        }
        if let Ok(timeout) = std::env::var("ROSTER_LOOKUP_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.lookup.timeout_ms = timeout_ms;
            }
        }
        if let Ok(policy) = std::env::var("ROSTER_DATE_POLICY") {
            if let Ok(date_policy) = policy.parse() {
                self.lookup.date_policy = date_policy;
            }
        }

        // Connectivity overrides
        if let Ok(path) = std::env::var("ROSTER_SENTINEL_PATH") {
            self.connectivity.sentinel_path = path;
        }
        if let Ok(timeout) = std::env::var("ROSTER_PROBE_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.connectivity.probe_timeout_ms = timeout_ms;
            }
        }
        if let Ok(retries) = std::env::var("ROSTER_PROBE_MAX_RETRIES") {
            if let Ok(max_retries) = retries.parse() {
                self.connectivity.max_retries = max_retries;
            }
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ConfigError::Invalid("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(".roster").join("config.toml"))
    }
}
