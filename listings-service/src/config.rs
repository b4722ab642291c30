//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `LISTINGS_`, nested keys split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/listings-service/{service_name}/config.toml
//! 4. System directory: /etc/listings-service/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "listings"
//! log_level = "debug"
//!
//! [listings]
//! default_page_size = 24
//! max_page_size = 96
//! ```
//!
//! `LISTINGS_LISTINGS__MAX_PAGE_SIZE=50` overrides `listings.max_page_size`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::DEFAULT_PAGE_SIZE;

const CONFIG_DIR: &str = "listings-service";
const ENV_PREFIX: &str = "LISTINGS_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    /// Search limits
    #[serde(default)]
    pub listings: ListingsConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Log level or `EnvFilter` directive (e.g. `info,listings_service=debug`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            environment: default_environment(),
        }
    }
}

/// Page size limits and criteria checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingsConfig {
    /// Page size used when a request does not give one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Reject criteria whose minimum price exceeds the maximum
    #[serde(default = "default_true")]
    pub validate_price_range: bool,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            validate_price_range: true,
        }
    }
}

fn default_name() -> String {
    CONFIG_DIR.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is taken from the running binary, falling back to
    /// `listings-service`.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(default_name);

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!(service = service_name, "searching for config files");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first, so later merges win
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::extract(figment.merge(Self::env()))
    }

    /// Load configuration from a specific file, plus environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env());

        Self::extract(figment)
    }

    /// Check limits that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let limits = &self.listings;
        if limits.max_page_size == 0 {
            return Err(Error::InvalidConfig(
                "listings.max_page_size must be at least 1".to_string(),
            ));
        }
        if limits.default_page_size == 0 || limits.default_page_size > limits.max_page_size {
            return Err(Error::InvalidConfig(format!(
                "listings.default_page_size must be between 1 and {}",
                limits.max_page_size
            )));
        }
        Ok(())
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Candidate config files, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let config_file = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg::BaseDirectories::with_prefix(CONFIG_DIR).find_config_file(&config_file)
        {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_DIR)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}
