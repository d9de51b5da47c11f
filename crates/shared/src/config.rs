//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Share-link and download-count expiry configuration.
    #[serde(default)]
    pub sharing: SharingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL embedded in share links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

/// Share-token and download-counter expiry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SharingConfig {
    /// Share token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Download counter lifetime in seconds, anchored at counter creation.
    #[serde(default = "default_count_ttl")]
    pub download_count_ttl_secs: u64,
}

fn default_token_ttl() -> u64 {
    3600 // 1 hour
}

fn default_count_ttl() -> u64 {
    3600 // 1 hour
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl(),
            download_count_ttl_secs: default_count_ttl(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        builder()?.try_deserialize()
    }
}

/// Builds the layered configuration source shared by all config consumers:
/// `config/default`, then `config/{RUN_MODE}`, then `DOCVAULT__`-prefixed
/// environment variables.
///
/// # Errors
///
/// Returns an error if a configuration source cannot be read.
pub fn builder() -> Result<config::Config, config::ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

    config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
        .add_source(config::Environment::with_prefix("DOCVAULT").separator("__"))
        .build()
}
