//! INI configuration file.
//!
//! ```ini
//! [zoom]
//! min = 10
//! max = 16
//!
//! [buffer]
//! size = 50
//!
//! [output]
//! suffix = .png
//! directory = /srv/tiles
//! null = false
//! tirex = false
//! append = DONE
//! check_exists = true
//! ```
//!
//! Every key is optional; absent keys leave the run settings untouched.

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::debug;

use super::ExpireConfig;
use crate::coord::MAX_ZOOM;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Values read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub minzoom: Option<u8>,
    pub maxzoom: Option<u8>,
    pub buffer_size: Option<f64>,
    pub suffix: Option<String>,
    pub directory: Option<PathBuf>,
    pub null_delimiter: Option<bool>,
    pub tirex: Option<bool>,
    pub trailer: Option<String>,
    pub check_exists: Option<bool>,
}

impl ConfigFile {
    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("zoom")) {
            config.minzoom = zoom_value(section, "min")?;
            config.maxzoom = zoom_value(section, "max")?;
        }

        if let Some(section) = ini.section(Some("buffer")) {
            if let Some(v) = section.get("size") {
                let size: f64 = v.trim().parse().map_err(|_| {
                    invalid("buffer", "size", v, "expected a distance in meters")
                })?;
                if !size.is_finite() || size < 0.0 {
                    return Err(invalid("buffer", "size", v, "must not be negative"));
                }
                config.buffer_size = Some(size);
            }
        }

        if let Some(section) = ini.section(Some("output")) {
            if let Some(v) = section.get("suffix") {
                if v.is_empty() {
                    return Err(invalid("output", "suffix", v, "must not be empty"));
                }
                config.suffix = Some(v.to_string());
            }
            if let Some(v) = section.get("directory") {
                let v = v.trim();
                if !v.is_empty() {
                    config.directory = Some(PathBuf::from(v));
                }
            }
            if let Some(v) = section.get("append") {
                config.trailer = Some(v.to_string());
            }
            config.null_delimiter = bool_value(section, "output", "null")?;
            config.tirex = bool_value(section, "output", "tirex")?;
            config.check_exists = bool_value(section, "output", "check_exists")?;
        }

        Ok(config)
    }

    /// Overlays the values present in the file onto `config`.
    pub fn apply_to(&self, mut config: ExpireConfig) -> ExpireConfig {
        if let Some(v) = self.minzoom {
            config.minzoom = v;
        }
        if let Some(v) = self.maxzoom {
            config.maxzoom = v;
        }
        if let Some(v) = self.buffer_size {
            config.buffer_size = v;
        }
        if let Some(v) = &self.suffix {
            config.suffix = v.clone();
        }
        if let Some(v) = &self.directory {
            config.directory = Some(v.clone());
        }
        if let Some(v) = self.null_delimiter {
            config.null_delimiter = v;
        }
        if let Some(v) = self.tirex {
            config.tirex = v;
        }
        if let Some(v) = &self.trailer {
            config.trailer = Some(v.clone());
        }
        if let Some(v) = self.check_exists {
            config.check_exists = v;
        }
        config
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn zoom_value(section: &Properties, key: &str) -> Result<Option<u8>, ConfigFileError> {
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    match v.trim().parse::<u8>() {
        Ok(zoom) if zoom <= MAX_ZOOM => Ok(Some(zoom)),
        _ => Err(invalid("zoom", key, v, "expected a zoom level between 0 and 32")),
    }
}

fn bool_value(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<bool>, ConfigFileError> {
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    match v.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Some(true)),
        "false" | "no" | "off" | "0" => Ok(Some(false)),
        _ => Err(invalid(section_name, key, v, "expected true or false")),
    }
}
