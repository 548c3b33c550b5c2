//! Reprojection of source geometries into the Web Mercator working plane.

use std::fmt;

use geo::Coord;
use thiserror::Error;

use super::Shape;
use crate::coord::{clamp_lat, lat_to_y, lon_to_x};

/// Errors from building or applying a [`WorkingProjection`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// No transformation from the source reference system is known
    #[error("Cannot transform from {0} to Web Mercator (EPSG:3857)")]
    UnsupportedCrs(String),

    /// A coordinate lies outside the domain of the source reference system
    #[error("Coordinate ({x}, {y}) is outside the valid range of {crs}")]
    OutOfRange { x: f64, y: f64, crs: SpatialRef },
}

/// Spatial reference system of a source layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpatialRef {
    /// Geographic longitude/latitude in degrees (EPSG:4326, OGC CRS84)
    Wgs84,
    /// Spherical Web Mercator meters (EPSG:3857 and its aliases)
    WebMercator,
    /// Any other named system
    Other(String),
}

impl SpatialRef {
    /// Recognizes the CRS names found in GeoJSON `crs` members.
    ///
    /// Accepts `EPSG:<code>`, `urn:ogc:def:crs:EPSG::<code>` and the OGC
    /// CRS84 URN, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        if upper == "CRS84" || upper.ends_with(":CRS84") {
            return SpatialRef::Wgs84;
        }
        if upper.contains("EPSG") {
            let code = upper.rsplit(':').next().and_then(|c| c.parse::<u32>().ok());
            match code {
                Some(4326) => return SpatialRef::Wgs84,
                Some(3857 | 3785 | 900913 | 102100 | 102113) => return SpatialRef::WebMercator,
                _ => {}
            }
        }
        SpatialRef::Other(name.trim().to_string())
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialRef::Wgs84 => write!(f, "WGS84 (EPSG:4326)"),
            SpatialRef::WebMercator => write!(f, "Web Mercator (EPSG:3857)"),
            SpatialRef::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Transformation from one layer's reference system into Web Mercator.
///
/// Built once per layer and passed by reference to whoever converts that
/// layer's features.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingProjection {
    source: SpatialRef,
}

impl WorkingProjection {
    /// Builds the transformation from `source` into Web Mercator.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::UnsupportedCrs`] for [`SpatialRef::Other`].
    pub fn new(source: &SpatialRef) -> Result<Self, ProjectionError> {
        match source {
            SpatialRef::Wgs84 | SpatialRef::WebMercator => Ok(Self {
                source: source.clone(),
            }),
            SpatialRef::Other(name) => Err(ProjectionError::UnsupportedCrs(name.clone())),
        }
    }

    /// Transforms a single coordinate.
    ///
    /// Geographic latitudes beyond the Web Mercator band are clamped to it;
    /// latitudes beyond the poles and non-finite values are rejected.
    pub fn transform_coord(&self, c: Coord) -> Result<Coord, ProjectionError> {
        let valid = match self.source {
            SpatialRef::Wgs84 => c.x.is_finite() && c.y.is_finite() && c.y.abs() <= 90.0,
            _ => c.x.is_finite() && c.y.is_finite(),
        };
        if !valid {
            return Err(ProjectionError::OutOfRange {
                x: c.x,
                y: c.y,
                crs: self.source.clone(),
            });
        }

        Ok(match self.source {
            SpatialRef::Wgs84 => Coord {
                x: lon_to_x(c.x),
                y: lat_to_y(clamp_lat(c.y)),
            },
            _ => c,
        })
    }

    /// Transforms every vertex of `shape`.
    pub fn transform(&self, shape: &Shape) -> Result<Shape, ProjectionError> {
        shape.try_map_coords(|c| self.transform_coord(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, point};

    #[test]
    fn test_recognizes_geographic_names() {
        for name in [
            "EPSG:4326",
            "epsg:4326",
            "urn:ogc:def:crs:EPSG::4326",
            "urn:ogc:def:crs:OGC:1.3:CRS84",
            "urn:ogc:def:crs:OGC::CRS84",
        ] {
            assert_eq!(SpatialRef::from_name(name), SpatialRef::Wgs84, "{}", name);
        }
    }

    #[test]
    fn test_recognizes_web_mercator_names() {
        for name in [
            "EPSG:3857",
            "EPSG:900913",
            "EPSG:3785",
            "urn:ogc:def:crs:EPSG::3857",
        ] {
            assert_eq!(
                SpatialRef::from_name(name),
                SpatialRef::WebMercator,
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_unknown_names_are_kept() {
        assert_eq!(
            SpatialRef::from_name("urn:ogc:def:crs:EPSG::27700"),
            SpatialRef::Other("urn:ogc:def:crs:EPSG::27700".to_string())
        );
        assert_eq!(
            SpatialRef::from_name("local grid"),
            SpatialRef::Other("local grid".to_string())
        );
    }

    #[test]
    fn test_unknown_crs_cannot_be_built() {
        let result = WorkingProjection::new(&SpatialRef::Other("EPSG:27700".to_string()));
        assert_eq!(
            result,
            Err(ProjectionError::UnsupportedCrs("EPSG:27700".to_string()))
        );
    }

    #[test]
    fn test_web_mercator_is_identity() {
        let projection = WorkingProjection::new(&SpatialRef::WebMercator).unwrap();

        let shape = Shape::from(point!(x: 1234.5, y: -678.9));
        assert_eq!(projection.transform(&shape).unwrap(), shape);
    }

    #[test]
    fn test_wgs84_projects_to_meters() {
        let projection = WorkingProjection::new(&SpatialRef::Wgs84).unwrap();
        let c = projection
            .transform_coord(coord! { x: -0.1, y: 51.5 })
            .unwrap();
        assert!((c.x - -11_131.949).abs() < 1e-3);
        assert!((c.y - 6_710_219.08).abs() < 0.5);
    }

    #[test]
    fn test_wgs84_clamps_polar_latitudes() {
        let projection = WorkingProjection::new(&SpatialRef::Wgs84).unwrap();
        let pole = projection.transform_coord(coord! { x: 0.0, y: 90.0 }).unwrap();
        let edge = projection
            .transform_coord(coord! { x: 0.0, y: crate::coord::MAX_LAT })
            .unwrap();
        assert!(pole.y.is_finite());
        assert_eq!(pole.y, edge.y);
    }

    #[test]
    fn test_wgs84_rejects_impossible_latitude() {
        let projection = WorkingProjection::new(&SpatialRef::Wgs84).unwrap();
        let shape = Shape::from(point!(x: 10.0, y: 95.0));
        assert!(matches!(
            projection.transform(&shape),
            Err(ProjectionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let projection = WorkingProjection::new(&SpatialRef::WebMercator).unwrap();
        assert!(projection
            .transform_coord(coord! { x: f64::NAN, y: 0.0 })
            .is_err());
    }
}
