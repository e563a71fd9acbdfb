use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::services::{DatasetColumns, RateLimitPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    pub datasets: DatasetSettings,
    #[serde(default)]
    pub proximity: ProximitySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum spacing between two geocoder requests
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl GeocoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(Duration::from_millis(self.min_interval_ms))
    }
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

fn default_geocoder_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { "app_after".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_min_interval_ms() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    pub restaurants_path: String,
    pub bars_path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub columns: ColumnSettings,
}

impl DatasetSettings {
    /// The delimiter as the single byte the CSV reader expects
    ///
    /// Only ASCII is accepted: any other char is more than one byte in a UTF-8 file.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::Message(format!(
                "Delimiter must be ASCII, got {:?}",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }
}

fn default_delimiter() -> char { ';' }

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSettings {
    #[serde(default = "default_name_column")]
    pub name: String,
    #[serde(default = "default_score_column")]
    pub score: String,
    #[serde(default = "default_category_column")]
    pub category: String,
    #[serde(default = "default_address_column")]
    pub address: String,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            score: default_score_column(),
            category: default_category_column(),
            address: default_address_column(),
        }
    }
}

impl From<ColumnSettings> for DatasetColumns {
    fn from(value: ColumnSettings) -> Self {
        DatasetColumns {
            name: value.name,
            score: value.score,
            category: value.category,
            address: value.address,
        }
    }
}

fn default_name_column() -> String { "NOME".to_string() }
fn default_score_column() -> String { "PONTUACAO".to_string() }
fn default_category_column() -> String { "TIPO".to_string() }
fn default_address_column() -> String { "LOCAL".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ProximitySettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            max_radius_km: default_max_radius_km(),
        }
    }
}

fn default_radius_km() -> f64 { 2.0 }
fn default_max_radius_km() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with AFTER_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., AFTER__GEOCODER__MIN_INTERVAL_MS -> geocoder.min_interval_ms
            .add_source(
                Environment::with_prefix("AFTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("AFTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
