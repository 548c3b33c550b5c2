//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! the spherical Web Mercator plane (EPSG:3857, meters) and tile indices.
//!
//! Tile indices returned by the `merc_*_to_tile` functions are fractional;
//! callers floor them. Y grows southward in tile space while it grows
//! northward in Mercator space.

mod range;
mod types;

pub use range::{bbox_tiles, BoundingBox, BoundingBoxError, ZoomRange};
pub use types::{TileCoord, EARTH_RADIUS, MAX_LAT, MAX_ZOOM, MERC_EXTENT, MIN_LAT};

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Projects a longitude in degrees to a Web Mercator x coordinate.
#[inline]
pub fn lon_to_x(lon: f64) -> f64 {
    EARTH_RADIUS * lon.to_radians()
}

/// Projects a latitude in degrees to a Web Mercator y coordinate.
///
/// Latitudes at or beyond ±90° project to infinity; see [`clamp_lat`].
#[inline]
pub fn lat_to_y(lat: f64) -> f64 {
    EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}

/// Inverse of [`lon_to_x`].
#[inline]
pub fn x_to_lon(x: f64) -> f64 {
    (x / EARTH_RADIUS).to_degrees()
}

/// Inverse of [`lat_to_y`].
#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees()
}

/// Clamps a latitude into the band covered by the Web Mercator tile pyramid.
#[inline]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Number of tiles along one axis at `zoom`.
#[inline]
pub fn tiles_per_axis(zoom: u8) -> f64 {
    2.0_f64.powi(zoom as i32)
}

/// Converts a Web Mercator x coordinate to a fractional tile column.
///
/// # Arguments
///
/// * `x` - Mercator x in meters (-20037508.34 to 20037508.34)
/// * `zoom` - Zoom level
#[inline]
pub fn merc_x_to_tile(x: f64, zoom: u8) -> f64 {
    (x + MERC_EXTENT) / (2.0 * MERC_EXTENT) * tiles_per_axis(zoom)
}

/// Converts a Web Mercator y coordinate to a fractional tile row.
///
/// # Arguments
///
/// * `y` - Mercator y in meters (-20037508.34 to 20037508.34)
/// * `zoom` - Zoom level
#[inline]
pub fn merc_y_to_tile(y: f64, zoom: u8) -> f64 {
    (MERC_EXTENT - y) / (2.0 * MERC_EXTENT) * tiles_per_axis(zoom)
}

/// Returns the Mercator x of the western edge of tile column `x`.
///
/// Takes a `u64` so that the eastern edge of the last column (`x + 1`) is
/// representable at zoom 32.
#[inline]
pub fn tile_x_to_merc(x: u64, zoom: u8) -> f64 {
    x as f64 / tiles_per_axis(zoom) * 2.0 * MERC_EXTENT - MERC_EXTENT
}

/// Returns the Mercator y of the northern edge of tile row `y`.
#[inline]
pub fn tile_y_to_merc(y: u64, zoom: u8) -> f64 {
    MERC_EXTENT - y as f64 / tiles_per_axis(zoom) * 2.0 * MERC_EXTENT
}

/// Linear scale factor of the Mercator projection at `lat` degrees.
///
/// A distance of `d` meters on the ground spans `d * mercator_scale(lat)`
/// Mercator units. The factor diverges towards the poles, so the latitude is
/// clamped to [`MIN_LAT`]..=[`MAX_LAT`] first.
#[inline]
pub fn mercator_scale(lat: f64) -> f64 {
    1.0 / clamp_lat(lat).to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} but got {} (tolerance {})",
            expected,
            actual,
            tolerance
        );
    }

    #[test]
    fn test_origin_projects_to_origin() {
        assert_close(lon_to_x(0.0), 0.0, 1e-9);
        assert_close(lat_to_y(0.0), 0.0, 1e-9);
    }

    #[test]
    fn test_antimeridian_projects_to_extent() {
        assert_close(lon_to_x(180.0), MERC_EXTENT, 1e-6);
        assert_close(lon_to_x(-180.0), -MERC_EXTENT, 1e-6);
    }

    #[test]
    fn test_max_lat_projects_to_extent() {
        // The Web Mercator latitude limit is chosen so the plane is square
        assert_close(lat_to_y(MAX_LAT), MERC_EXTENT, 1.0);
        assert_close(lat_to_y(MIN_LAT), -MERC_EXTENT, 1.0);
    }

    #[test]
    fn test_london_projection() {
        // Known EPSG:3857 coordinates of 51.5°N, 0.1°W
        assert_close(lon_to_x(-0.1), -11131.949, 1e-3);
        assert_close(lat_to_y(51.5), 6_710_219.08, 0.5);
    }

    #[test]
    fn test_tile_index_of_origin() {
        assert_close(merc_x_to_tile(0.0, 1), 1.0, 1e-12);
        assert_close(merc_y_to_tile(0.0, 1), 1.0, 1e-12);
        assert_close(merc_x_to_tile(-MERC_EXTENT, 10), 0.0, 1e-12);
        assert_close(merc_y_to_tile(MERC_EXTENT, 10), 0.0, 1e-12);
    }

    #[test]
    fn test_tile_edges() {
        assert_close(tile_x_to_merc(0, 3), -MERC_EXTENT, 1e-6);
        assert_close(tile_x_to_merc(8, 3), MERC_EXTENT, 1e-6);
        assert_close(tile_y_to_merc(0, 3), MERC_EXTENT, 1e-6);
        assert_close(tile_y_to_merc(4, 3), 0.0, 1e-6);
        assert_close(tile_x_to_merc(1 << 32, 32), MERC_EXTENT, 1e-6);
    }

    #[test]
    fn test_mercator_scale() {
        assert_close(mercator_scale(0.0), 1.0, 1e-12);
        assert_close(mercator_scale(60.0), 2.0, 1e-9);
        assert_close(mercator_scale(-60.0), 2.0, 1e-9);
    }

    #[test]
    fn test_mercator_scale_is_finite_at_poles() {
        let scale = mercator_scale(90.0);
        assert!(scale.is_finite());
        assert_close(scale, mercator_scale(MAX_LAT), 1e-9);
    }

    #[test]
    fn test_clamp_lat() {
        assert_eq!(clamp_lat(89.0), MAX_LAT);
        assert_eq!(clamp_lat(-89.0), MIN_LAT);
        assert_eq!(clamp_lat(12.5), 12.5);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_lon_roundtrip(lon in -180.0..180.0_f64) {
                let back = x_to_lon(lon_to_x(lon));
                prop_assert!((back - lon).abs() < 1e-9, "{} -> {}", lon, back);
            }

            #[test]
            fn test_lat_roundtrip(lat in -85.05..85.05_f64) {
                let back = y_to_lat(lat_to_y(lat));
                prop_assert!((back - lat).abs() < 1e-9, "{} -> {}", lat, back);
            }

            #[test]
            fn test_tile_x_inverse(x in 0u64..1024, zoom in 10u8..=20) {
                let merc = tile_x_to_merc(x, zoom);
                prop_assert!((merc_x_to_tile(merc, zoom) - x as f64).abs() < 1e-6);
            }

            #[test]
            fn test_tile_y_inverse(y in 0u64..1024, zoom in 10u8..=20) {
                let merc = tile_y_to_merc(y, zoom);
                prop_assert!((merc_y_to_tile(merc, zoom) - y as f64).abs() < 1e-6);
            }

            #[test]
            fn test_tile_index_in_bounds(
                lat in -85.05..85.05_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=24
            ) {
                let n = tiles_per_axis(zoom);
                let tx = merc_x_to_tile(lon_to_x(lon), zoom);
                let ty = merc_y_to_tile(lat_to_y(lat), zoom);
                prop_assert!((0.0..n).contains(&tx), "x {} outside [0, {})", tx, n);
                prop_assert!((0.0..n).contains(&ty), "y {} outside [0, {})", ty, n);
            }

            #[test]
            fn test_scale_grows_with_latitude(
                lat1 in 0.0..40.0_f64,
                lat2 in 40.0..85.0_f64
            ) {
                prop_assert!(mercator_scale(lat1) < mercator_scale(lat2));
            }
        }
    }
}
