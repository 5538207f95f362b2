//! Configuration management for `TourMap`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TourMapError;
use crate::models::query::{MAX_RADIUS_METERS, MIN_RADIUS_METERS, Region};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourMapConfig {
    /// Remote catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default request settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Remote catalog configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog service key. Required.
    pub api_key: Option<String>,
    /// Base URL of the catalog service
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_catalog_timeout")]
    pub timeout_seconds: u64,
    /// Rows requested per page
    #[serde(default = "default_catalog_rows")]
    pub rows_per_page: u32,
    /// Application identifier sent as `MobileApp`
    #[serde(default = "default_catalog_app_name")]
    pub app_name: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for fetched payloads, in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Search radius around a hotel in meters
    #[serde(default = "default_radius_meters")]
    pub radius_meters: u32,
    /// Size of the nearest-N list
    #[serde(default = "default_nearest_count")]
    pub nearest_count: usize,
    /// Region code used when none is given
    #[serde(default = "default_region_code")]
    pub region_code: u32,
    /// Seed for placeholder price and rating; entropy when absent
    pub attribute_seed: Option<u64>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Per-request timeout applied by the server, in seconds
    #[serde(default = "default_server_timeout")]
    pub request_timeout_seconds: u64,
}

// Default value functions
fn default_catalog_base_url() -> String {
    "https://apis.data.go.kr/B551011/EngService1".to_string()
}

fn default_catalog_timeout() -> u64 {
    10
}

fn default_catalog_rows() -> u32 {
    100
}

fn default_catalog_app_name() -> String {
    "TourMap".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_radius_meters() -> u32 {
    1000
}

fn default_nearest_count() -> usize {
    5
}

fn default_region_code() -> u32 {
    1
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_timeout() -> u64 {
    30
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_catalog_base_url(),
            timeout_seconds: default_catalog_timeout(),
            rows_per_page: default_catalog_rows(),
            app_name: default_catalog_app_name(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
            nearest_count: default_nearest_count(),
            region_code: default_region_code(),
            attribute_seed: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            request_timeout_seconds: default_server_timeout(),
        }
    }
}

impl Default for TourMapConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl TourMapConfig {
    /// Load configuration from `config_path`, or from the user config dir when absent,
    /// then apply `TOURMAP_*` environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TOURMAP_CATALOG__API_KEY, TOURMAP_CACHE__TTL_SECONDS, ...
        builder = builder.add_source(
            Environment::with_prefix("TOURMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TourMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tourmap").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.catalog.base_url.is_empty() {
            self.catalog.base_url = default_catalog_base_url();
        }
        if self.catalog.app_name.is_empty() {
            self.catalog.app_name = default_catalog_app_name();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.nearest_count == 0 {
            self.defaults.nearest_count = default_nearest_count();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.catalog.timeout_seconds == 0 || self.catalog.timeout_seconds > 60 {
            return Err(TourMapError::config(
                "Catalog timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if !(1..=200).contains(&self.catalog.rows_per_page) {
            return Err(TourMapError::config("Catalog rows per page must be between 1 and 200").into());
        }

        if self.cache.ttl_seconds == 0 || self.cache.ttl_seconds > 86_400 {
            return Err(TourMapError::config(
                "Cache TTL must be between 1 second and 86400 seconds (1 day)",
            )
            .into());
        }

        if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&self.defaults.radius_meters) {
            return Err(TourMapError::config(format!(
                "Default radius must be between {MIN_RADIUS_METERS} and {MAX_RADIUS_METERS} meters"
            ))
            .into());
        }

        if self.defaults.nearest_count > 50 {
            return Err(TourMapError::config("Nearest count cannot exceed 50").into());
        }

        if self.server.request_timeout_seconds <= 2 * self.catalog.timeout_seconds {
            return Err(TourMapError::config(format!(
                "Request timeout ({}s) must be more than twice the catalog timeout ({}s)",
                self.server.request_timeout_seconds, self.catalog.timeout_seconds
            ))
            .into());
        }

        if Region::from_code(self.defaults.region_code).is_none() {
            return Err(TourMapError::config(format!(
                "Unknown default region code {}",
                self.defaults.region_code
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TourMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TourMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.catalog.base_url.starts_with("http://")
            && !self.catalog.base_url.starts_with("https://")
        {
            return Err(
                TourMapError::config("Catalog base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}

impl CatalogConfig {
    /// Validate the catalog credential.
    ///
    /// Runs before any request is built, so a bad key never reaches the network.
    pub fn validate_api_key(&self) -> crate::Result<&str> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(TourMapError::config(
                "Catalog API key is missing. Set catalog.api_key or TOURMAP_CATALOG__API_KEY.",
            ));
        };

        if api_key.trim().is_empty() {
            return Err(TourMapError::config("Catalog API key cannot be empty"));
        }

        if api_key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TourMapError::config(
                "Catalog API key appears to be malformed (contains whitespace)",
            ));
        }

        if api_key.len() < 8 {
            return Err(TourMapError::config(
                "Catalog API key appears to be invalid (too short). Please check your API key.",
            ));
        }

        if api_key.len() > 256 {
            return Err(TourMapError::config(
                "Catalog API key appears to be invalid (too long). Please check your API key.",
            ));
        }

        Ok(api_key)
    }
}
