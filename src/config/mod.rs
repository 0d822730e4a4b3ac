//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file (named by `GATELOG_CONFIG`)
//! followed by individual environment overrides. Every section is optional;
//! missing values fall back to the defaults below.
//!
//! ```yaml
//! server:
//!   bind_addr: "0.0.0.0:8080"
//! geofence:
//!   latitude: -23.516185
//!   longitude: -46.965741
//!   radius_meters: 300.0
//! timezone: "America/Sao_Paulo"
//! storage:
//!   backend: json_lines
//!   path: "data/registrations.jsonl"
//! ```

use crate::core::error::ConfigError;
use crate::core::geo::{Coordinate, ReferencePoint};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "GATELOG_CONFIG";

pub const BIND_ADDR_ENV: &str = "GATELOG_BIND_ADDR";
pub const REFERENCE_LATITUDE_ENV: &str = "GATELOG_REFERENCE_LATITUDE";
pub const REFERENCE_LONGITUDE_ENV: &str = "GATELOG_REFERENCE_LONGITUDE";
pub const RADIUS_METERS_ENV: &str = "GATELOG_RADIUS_METERS";
pub const TIMEZONE_ENV: &str = "GATELOG_TIMEZONE";
pub const STORE_PATH_ENV: &str = "GATELOG_STORE_PATH";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (e.g., "0.0.0.0:8080")
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Facility reference point and allowed radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeofenceConfig {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(exclusive_min = 0.0))]
    pub radius_meters: f64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            latitude: -23.516185,
            longitude: -46.965741,
            radius_meters: 300.0,
        }
    }
}

/// Which record store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    JsonLines,
}

/// Record store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// File used by the `json_lines` backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("data/registrations.jsonl"),
        }
    }
}

/// Complete kiosk configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub server: ServerConfig,
    pub geofence: GeofenceConfig,

    /// IANA timezone used to stamp records (e.g., "America/Sao_Paulo")
    pub timezone: String,

    pub storage: StorageConfig,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            geofence: GeofenceConfig::default(),
            timezone: "America/Sao_Paulo".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl KioskConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Load from the process environment and validate
    ///
    /// Reads the file named by `GATELOG_CONFIG` if set, otherwise starts from
    /// defaults, then applies `GATELOG_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GATELOG_*` overrides looked up through `lookup`
    ///
    /// Setting a store path also switches the backend to `json_lines`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            self.server.bind_addr = addr;
        }
        if let Some(value) = lookup(REFERENCE_LATITUDE_ENV) {
            self.geofence.latitude = parse_f64(REFERENCE_LATITUDE_ENV, &value)?;
        }
        if let Some(value) = lookup(REFERENCE_LONGITUDE_ENV) {
            self.geofence.longitude = parse_f64(REFERENCE_LONGITUDE_ENV, &value)?;
        }
        if let Some(value) = lookup(RADIUS_METERS_ENV) {
            self.geofence.radius_meters = parse_f64(RADIUS_METERS_ENV, &value)?;
        }
        if let Some(tz) = lookup(TIMEZONE_ENV) {
            self.timezone = tz;
        }
        if let Some(path) = lookup(STORE_PATH_ENV) {
            self.storage.backend = StorageBackend::JsonLines;
            self.storage.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Check ranges, the reference point and the timezone name
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geofence
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "geofence".to_string(),
                message: e.to_string(),
            })?;
        self.reference_point()?;
        self.timezone()?;
        Ok(())
    }

    /// Reference point built from the geofence section
    pub fn reference_point(&self) -> Result<ReferencePoint, ConfigError> {
        let invalid = |e: crate::core::error::InvalidCoordinate| ConfigError::InvalidValue {
            key: "geofence".to_string(),
            message: e.to_string(),
        };

        let point =
            Coordinate::try_new(self.geofence.latitude, self.geofence.longitude).map_err(invalid)?;
        ReferencePoint::try_new(point, self.geofence.radius_meters).map_err(invalid)
    }

    /// Parsed civil timezone
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "timezone".to_string(),
                message: e.to_string(),
            })
    }
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}' is not a number", value),
        })
}
