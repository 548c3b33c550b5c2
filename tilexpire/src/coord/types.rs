//! Coordinate type definitions

use std::fmt;

/// Equatorial radius of the spherical Web Mercator model, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the Web Mercator plane, in meters.
///
/// The plane spans `[-MERC_EXTENT, MERC_EXTENT]` on both axes.
pub const MERC_EXTENT: f64 = EARTH_RADIUS * std::f64::consts::PI;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Deepest zoom level whose quadkeys still fit into 64 bits.
pub const MAX_ZOOM: u8 = 32;

/// Tile coordinates in the Web Mercator / Slippy Map system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// X coordinate (west-east), 0 at the antimeridian
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
    /// Zoom level (0-32)
    pub zoom: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Returns the tile `dz` levels up the quadtree that contains this tile.
    ///
    /// `dz` larger than the tile's zoom yields the root tile.
    #[inline]
    pub fn ancestor(&self, dz: u8) -> TileCoord {
        let dz = dz.min(self.zoom);
        TileCoord {
            x: self.x.checked_shr(dz as u32).unwrap_or(0),
            y: self.y.checked_shr(dz as u32).unwrap_or(0),
            zoom: self.zoom - dz,
        }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
