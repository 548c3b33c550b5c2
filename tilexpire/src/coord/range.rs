//! Bounding boxes and the tile rectangles they cover.

use std::str::FromStr;

use thiserror::Error;

use super::{clamp_lat, lat_to_y, lon_to_x, merc_x_to_tile, merc_y_to_tile, TileCoord};

/// Errors from parsing a `min_lon,min_lat,max_lon,max_lat` string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    /// Fewer than four comma separated values
    #[error("Bounding box contains less than four elements (got {0})")]
    TooFewElements(usize),

    /// A component is not a number
    #[error("Bounding box element '{0}' is not a number")]
    InvalidNumber(String),
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }
}

impl Default for BoundingBox {
    /// The whole world minus the polar caps.
    fn default() -> Self {
        Self::new(-180.0, -83.0, 180.0, 83.0)
    }
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    /// Parses `min_lon,min_lat,max_lon,max_lat`. Values after the fourth are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() < 4 {
            return Err(BoundingBoxError::TooFewElements(parts.len()));
        }

        let mut coords = [0.0_f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            let part = part.trim();
            *slot = part
                .parse()
                .map_err(|_| BoundingBoxError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::new(coords[0], coords[1], coords[2], coords[3]))
    }
}

/// Inclusive rectangle of tile indices at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    pub zoom: u8,
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl ZoomRange {
    /// Every tile of the given zoom level.
    pub fn full(zoom: u8) -> Self {
        let max = max_index(zoom);
        Self {
            zoom,
            xmin: 0,
            ymin: 0,
            xmax: max,
            ymax: max,
        }
    }

    /// Build a zoom range from a bounding box in geographic coordinates.
    ///
    /// `ymin` comes from the northern edge because tile rows grow southward.
    /// Latitudes outside the Web Mercator band are clamped to it.
    pub fn from_bbox_geographic(bbox: &BoundingBox, zoom: u8) -> Self {
        Self::from_bbox_webmerc(
            lon_to_x(bbox.min_lon),
            lat_to_y(clamp_lat(bbox.min_lat)),
            lon_to_x(bbox.max_lon),
            lat_to_y(clamp_lat(bbox.max_lat)),
            zoom,
        )
    }

    /// Build a zoom range from a bounding box in Web Mercator coordinates.
    ///
    /// Indices are clamped to `[0, 2^zoom - 1]`, so a box reaching the east or
    /// south edge of the world ends in the last column or row.
    pub fn from_bbox_webmerc(x1: f64, y1: f64, x2: f64, y2: f64, zoom: u8) -> Self {
        Self {
            zoom,
            xmin: to_index(merc_x_to_tile(x1, zoom), zoom),
            ymin: to_index(merc_y_to_tile(y2, zoom), zoom),
            xmax: to_index(merc_x_to_tile(x2, zoom), zoom),
            ymax: to_index(merc_y_to_tile(y1, zoom), zoom),
        }
    }

    /// Index difference between the last and first column (tile count minus one).
    pub fn width(&self) -> u32 {
        self.xmax.saturating_sub(self.xmin)
    }

    /// Index difference between the last and first row (tile count minus one).
    pub fn height(&self) -> u32 {
        self.ymax.saturating_sub(self.ymin)
    }

    pub fn is_single_tile(&self) -> bool {
        self.width() == 0 && self.height() == 0
    }

    /// Iterates the rectangle column by column (x outer, y inner).
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> {
        let ZoomRange {
            zoom,
            xmin,
            ymin,
            xmax,
            ymax,
        } = *self;
        (xmin..=xmax).flat_map(move |x| (ymin..=ymax).map(move |y| TileCoord::new(x, y, zoom)))
    }
}

/// Tiles of every zoom level in `minzoom..=maxzoom` overlapped by `bbox`,
/// zoom by zoom.
pub fn bbox_tiles(
    bbox: BoundingBox,
    minzoom: u8,
    maxzoom: u8,
) -> impl Iterator<Item = TileCoord> {
    (minzoom..=maxzoom)
        .flat_map(move |zoom| ZoomRange::from_bbox_geographic(&bbox, zoom).tiles())
}

fn max_index(zoom: u8) -> u32 {
    ((1u64 << zoom) - 1) as u32
}

fn to_index(tile: f64, zoom: u8) -> u32 {
    // NaN casts to 0
    tile.floor().clamp(0.0, max_index(zoom) as f64) as u32
}
