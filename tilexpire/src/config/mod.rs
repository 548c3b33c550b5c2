//! Run settings.
//!
//! [`ExpireConfig`] holds everything a run needs. It starts from defaults,
//! can be overlaid from an INI file ([`ConfigFile`]) and is then adjusted by
//! the caller (the CLI applies its flags last).

mod file;

use std::path::PathBuf;

pub use file::{ConfigFile, ConfigFileError};

/// Zoom levels are shifted by this much in tirex mode.
pub const TIREX_ZOOM_OFFSET: u8 = 3;

/// Default highest zoom level.
pub const DEFAULT_MAXZOOM: u8 = 14;

/// Settings for one expiry run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpireConfig {
    /// Lowest zoom level written.
    pub minzoom: u8,

    /// Highest zoom level written. Geometries are tested against tiles of
    /// this level only.
    pub maxzoom: u8,

    /// Buffer around geometries in meters (0 disables buffering).
    pub buffer_size: f64,

    /// Appended to every tile path, e.g. `.png`.
    pub suffix: String,

    /// Prefixed to every tile path and used for existence checks.
    pub directory: Option<PathBuf>,

    /// Separate entries with NUL instead of newline.
    pub null_delimiter: bool,

    /// Write tirex metatile coordinates instead of tile paths.
    pub tirex: bool,

    /// Only write tiles whose file exists on disk.
    pub check_exists: bool,

    /// Line written once after all tiles.
    pub trailer: Option<String>,
}

impl Default for ExpireConfig {
    fn default() -> Self {
        Self {
            minzoom: 0,
            maxzoom: DEFAULT_MAXZOOM,
            buffer_size: 0.0,
            suffix: String::new(),
            directory: None,
            null_delimiter: false,
            tirex: false,
            check_exists: false,
            trailer: None,
        }
    }
}

impl ExpireConfig {
    /// Create a configuration for the given zoom levels.
    pub fn new(minzoom: u8, maxzoom: u8) -> Self {
        Self {
            minzoom,
            maxzoom,
            ..Default::default()
        }
    }

    /// Set the buffer distance in meters.
    pub fn with_buffer_size(mut self, meters: f64) -> Self {
        self.buffer_size = meters;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Use NUL instead of newline between entries.
    pub fn with_null_delimiter(mut self, enabled: bool) -> Self {
        self.null_delimiter = enabled;
        self
    }

    pub fn with_tirex(mut self, enabled: bool) -> Self {
        self.tirex = enabled;
        self
    }

    pub fn with_check_exists(mut self, enabled: bool) -> Self {
        self.check_exists = enabled;
        self
    }

    pub fn with_trailer(mut self, trailer: impl Into<String>) -> Self {
        self.trailer = Some(trailer.into());
        self
    }

    /// Byte written after every entry.
    pub fn delimiter(&self) -> u8 {
        if self.null_delimiter {
            b'\0'
        } else {
            b'\n'
        }
    }

    /// Zoom levels `(minzoom, maxzoom)` the tile engine works at.
    ///
    /// In tirex mode both are lowered by [`TIREX_ZOOM_OFFSET`] (stopping at
    /// 0), since one tirex metatile covers 8 x 8 tiles.
    pub fn effective_zooms(&self) -> (u8, u8) {
        if self.tirex {
            (
                self.minzoom.saturating_sub(TIREX_ZOOM_OFFSET),
                self.maxzoom.saturating_sub(TIREX_ZOOM_OFFSET),
            )
        } else {
            (self.minzoom, self.maxzoom)
        }
    }
}
