//! Mapping geometries onto the tiles they touch.
//!
//! ```text
//! Shape ─► bbox ─► buffer? ─► ZoomRange @ maxzoom ─► intersects? ─► TileList
//! ```

use geo::{coord, Rect};
use tracing::{debug, info, warn};

use crate::coord::{mercator_scale, tile_x_to_merc, tile_y_to_merc, y_to_lat, ZoomRange};
use crate::error::ExpireResult;
use crate::geometry::{Shape, WorkingProjection};
use crate::source::{to_shape, VectorSource};
use crate::tile::{CollapsedTiles, TileList};

/// How often progress is logged while walking a layer.
const PROGRESS_INTERVAL: usize = 10;

/// Collects the tiles touched by geometries at `maxzoom`.
///
/// Tiles are only tested at the maximum zoom; coarser levels down to
/// `minzoom` are derived by [`finish`](Self::finish).
#[derive(Debug)]
pub struct IntersectingTilesFinder {
    minzoom: u8,
    tiles: TileList,
}

impl IntersectingTilesFinder {
    pub fn new(minzoom: u8, maxzoom: u8) -> Self {
        Self {
            minzoom,
            tiles: TileList::new(maxzoom),
        }
    }

    pub fn maxzoom(&self) -> u8 {
        self.tiles.maxzoom()
    }

    /// Number of distinct tiles collected so far at the maximum zoom.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Marks every max-zoom tile touched by `shape` as dirty.
    ///
    /// `shape` must be in Web Mercator meters. A positive `buffer_size` (in
    /// meters on the ground) first expands the shape; the distance is scaled
    /// by the Mercator scale factor at the latitude of the bounding box
    /// center. Empty shapes are ignored.
    ///
    /// If the bounding box falls inside one tile, that tile is taken without
    /// an intersection test.
    pub fn add_shape(&mut self, shape: &Shape, buffer_size: f64) {
        let Some(mut bbox) = shape.bbox() else {
            debug!(kind = shape.kind(), "Skipping empty geometry");
            return;
        };

        let buffered;
        let shape = if buffer_size > 0.0 {
            let mid_y = bbox.min().y + (bbox.max().y - bbox.min().y) / 2.0;
            let radius = buffer_size * mercator_scale(y_to_lat(mid_y));
            buffered = shape.buffer(radius);
            match buffered.bbox() {
                Some(b) => bbox = b,
                None => return,
            }
            &buffered
        } else {
            shape
        };

        let zoom = self.maxzoom();
        let range =
            ZoomRange::from_bbox_webmerc(bbox.min().x, bbox.min().y, bbox.max().x, bbox.max().y, zoom);

        if range.is_single_tile() {
            self.tiles.add(range.xmin, range.ymin);
            return;
        }

        for tile in range.tiles() {
            if shape.intersects(&tile_rect(tile.x, tile.y, zoom)) {
                self.tiles.add(tile.x, tile.y);
            }
        }
    }

    /// Adds every geometry of every usable layer of `source`.
    ///
    /// Layers without a spatial reference and empty layers are skipped with
    /// a warning. Returns the number of features processed.
    ///
    /// # Errors
    ///
    /// Fails on the first layer whose reference system cannot be transformed
    /// and on the first feature that cannot be converted or reprojected.
    pub fn find_intersections<S>(&mut self, source: &S, buffer_size: f64) -> ExpireResult<usize>
    where
        S: VectorSource + ?Sized,
    {
        let mut processed = 0;

        for layer in source.layers() {
            let Some(spatial_ref) = &layer.spatial_ref else {
                warn!(
                    layer = %layer.name,
                    source = source.name(),
                    "Layer has no spatial reference, skipping"
                );
                continue;
            };
            if layer.is_empty() {
                warn!(layer = %layer.name, source = source.name(), "Layer is empty, skipping");
                continue;
            }

            let projection = WorkingProjection::new(spatial_ref)?;
            let total = layer.feature_count();
            info!(
                "Processing {} features from layer {} of {}",
                total,
                layer.name,
                source.name()
            );

            for (index, geometry) in layer.geometries.iter().enumerate() {
                if index % PROGRESS_INTERVAL == 0 {
                    debug!(
                        layer = %layer.name,
                        feature = index,
                        total,
                        tiles = self.tiles.len(),
                        "Progress"
                    );
                }
                let shape = projection.transform(&to_shape(geometry)?)?;
                self.add_shape(&shape, buffer_size);
                processed += 1;
            }
        }

        Ok(processed)
    }

    /// Ends collection and returns the tiles of every level from `maxzoom`
    /// down to `minzoom`.
    pub fn finish(self) -> CollapsedTiles {
        debug!(tiles = self.tiles.len(), maxzoom = self.maxzoom(), "Collapsing dirty tiles");
        self.tiles.into_tiles(self.minzoom)
    }
}

/// Web Mercator extent of tile `(x, y)` at `zoom`.
fn tile_rect(x: u32, y: u32, zoom: u8) -> Rect {
    let (x, y) = (x as u64, y as u64);
    Rect::new(
        coord! { x: tile_x_to_merc(x, zoom), y: tile_y_to_merc(y + 1, zoom) },
        coord! { x: tile_x_to_merc(x + 1, zoom), y: tile_y_to_merc(y, zoom) },
    )
}
