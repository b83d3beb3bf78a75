use crate::core::{ArrayCenter, OutputFrame, UtmZone};
use crate::processing::survey::DEFAULT_ANTENNA_FILE;
use crate::reference::{CminfoReference, CminfoSettings, ReferenceSource, StaticReference};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Antenna survey list
    pub antenna_file: PathBuf,
    /// Output file, `-` for stdout. Derived from the frame when unset.
    pub output_file: Option<PathBuf>,
    /// UTM zone of the survey coordinates
    pub utm_zone: UtmZone,
    /// Output frame
    pub frame: OutputFrame,
    /// Pretty print the JSON output
    pub pretty: bool,
    /// Where the center of array comes from
    pub reference: ReferenceConfig,
}

/// Center of array source selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ReferenceConfig {
    /// Read from the cminfo hash in the key-value cache
    #[serde(rename = "redis")]
    Cminfo(CminfoSettings),
    /// Fixed value
    Static(ArrayCenter),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            antenna_file: PathBuf::from(DEFAULT_ANTENNA_FILE),
            output_file: None,
            utm_zone: UtmZone::default(),
            frame: OutputFrame::default(),
            pretty: false,
            reference: ReferenceConfig::default(),
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig::Cminfo(CminfoSettings::default())
    }
}

impl ReferenceConfig {
    /// Build the matching reference source
    pub fn source(&self) -> Box<dyn ReferenceSource> {
        match self {
            ReferenceConfig::Cminfo(settings) => Box::new(CminfoReference::new(settings.clone())),
            ReferenceConfig::Static(cofa) => Box::new(StaticReference::new(*cofa)),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str.clone(),
            source,
        })?;

        config.validate()?;
        debug!("loaded configuration from {}", path_str);
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = self.to_json().map_err(|source| ConfigError::Parse {
            path: path_str.clone(),
            source,
        })?;

        fs::write(&path, content).map_err(|source| ConfigError::Io { path: path_str, source })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Output path, defaulting to `HERA_350_<FRAME>.json`
    pub fn output_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("HERA_350_{}.json", self.frame)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.antenna_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "antenna_file".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }

        match &self.reference {
            ReferenceConfig::Cminfo(settings) => {
                if settings.url.is_empty() {
                    return Err(ConfigError::InvalidParameter {
                        parameter: "reference.url".to_string(),
                        value: String::new(),
                        reason: "must not be empty".to_string(),
                    });
                }
                if settings.key.is_empty() {
                    return Err(ConfigError::InvalidParameter {
                        parameter: "reference.key".to_string(),
                        value: String::new(),
                        reason: "must not be empty".to_string(),
                    });
                }
                if settings.timeout_ms == 0 {
                    return Err(ConfigError::InvalidParameter {
                        parameter: "reference.timeout_ms".to_string(),
                        value: "0".to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
            },
            ReferenceConfig::Static(cofa) => {
                if !(-90.0..=90.0).contains(&cofa.latitude) {
                    return Err(ConfigError::InvalidParameter {
                        parameter: "reference.latitude".to_string(),
                        value: cofa.latitude.to_string(),
                        reason: "must be between -90 and 90 degrees".to_string(),
                    });
                }
                if !(-180.0..=180.0).contains(&cofa.longitude) {
                    return Err(ConfigError::InvalidParameter {
                        parameter: "reference.longitude".to_string(),
                        value: cofa.longitude.to_string(),
                        reason: "must be between -180 and 180 degrees".to_string(),
                    });
                }
                if !cofa.altitude.is_finite() {
                    return Err(ConfigError::InvalidParameter {
                        parameter: "reference.altitude".to_string(),
                        value: cofa.altitude.to_string(),
                        reason: "must be finite".to_string(),
                    });
                }
            },
        }

        Ok(())
    }
}
