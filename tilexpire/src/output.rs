//! Writing tile lists.
//!
//! Two entry forms exist:
//!
//! ```text
//! normal:  [directory/]zoom/x/y[suffix]          e.g. /srv/tiles/12/2046/1361.png
//! tirex:   x=<x*8> y=<y*8> z=<zoom+3>[suffix]    e.g. x=16368 y=10888 z=15
//! ```
//!
//! In tirex mode the tile engine runs three zoom levels lower (see
//! [`ExpireConfig::effective_zooms`]), so every tile it yields names the
//! 8 x 8 metatile of the requested level.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ExpireConfig, TIREX_ZOOM_OFFSET};
use crate::coord::TileCoord;

/// Formats tiles and writes them, one entry per delimiter-terminated record.
#[derive(Debug)]
pub struct TileWriter<W: Write> {
    out: W,
    suffix: String,
    directory: Option<PathBuf>,
    tirex: bool,
    check_exists: bool,
    delimiter: u8,
    written: u64,
    skipped: u64,
}

impl<W: Write> TileWriter<W> {
    /// Create a writer using the output settings of `config`.
    pub fn new(out: W, config: &ExpireConfig) -> Self {
        Self {
            out,
            suffix: config.suffix.clone(),
            directory: config.directory.clone(),
            tirex: config.tirex,
            check_exists: config.check_exists,
            delimiter: config.delimiter(),
            written: 0,
            skipped: 0,
        }
    }

    /// Formats one tile without writing it.
    ///
    /// The directory prefix only applies to the normal form.
    pub fn format_tile(&self, tile: &TileCoord) -> String {
        if self.tirex {
            return format!(
                "x={} y={} z={}{}",
                tile.x as u64 * 8,
                tile.y as u64 * 8,
                tile.zoom + TIREX_ZOOM_OFFSET,
                self.suffix
            );
        }

        let path = format!("{}/{}/{}{}", tile.zoom, tile.x, tile.y, self.suffix);
        match &self.directory {
            Some(dir) => dir.join(path).display().to_string(),
            None => path,
        }
    }

    /// Writes one tile.
    ///
    /// With existence checks enabled, a tile whose path does not exist on
    /// disk is skipped and `false` is returned.
    pub fn write_tile(&mut self, tile: &TileCoord) -> io::Result<bool> {
        let entry = self.format_tile(tile);
        if self.check_exists && !self.tirex && !Path::new(&entry).exists() {
            self.skipped += 1;
            return Ok(false);
        }
        self.write_record(&entry)?;
        self.written += 1;
        Ok(true)
    }

    /// Writes every tile of `tiles`, returning how many were written.
    pub fn write_tiles<I>(&mut self, tiles: I) -> io::Result<u64>
    where
        I: IntoIterator<Item = TileCoord>,
    {
        let before = self.written;
        for tile in tiles {
            self.write_tile(&tile)?;
        }
        Ok(self.written - before)
    }

    /// Writes `trailer` followed by the delimiter.
    pub fn write_trailer(&mut self, trailer: &str) -> io::Result<()> {
        self.write_record(trailer)
    }

    /// Number of tiles written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Number of tiles dropped by the existence check.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        debug!(
            written = self.written,
            skipped = self.skipped,
            "Tile list complete"
        );
        Ok(self.out)
    }

    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.out.write_all(record.as_bytes())?;
        self.out.write_all(&[self.delimiter])
    }
}
