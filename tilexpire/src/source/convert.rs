//! GeoJSON geometry to [`Shape`] conversion.

use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use geojson::Value;

use super::SourceError;
use crate::geometry::Shape;

/// Converts a GeoJSON geometry into a [`Shape`].
///
/// Coordinates are copied as they are; reprojection happens later.
///
/// # Errors
///
/// - [`SourceError::UnsupportedGeometry`] for geometry collections
/// - [`SourceError::InvalidGeometry`] for positions with fewer than two values
pub fn to_shape(geometry: &geojson::Geometry) -> Result<Shape, SourceError> {
    Ok(match &geometry.value {
        Value::Point(p) => Shape::Point(Point::from(position(p)?)),
        Value::MultiPoint(points) => Shape::MultiPoint(MultiPoint::new(
            points
                .iter()
                .map(|p| position(p).map(Point::from))
                .collect::<Result<_, _>>()?,
        )),
        Value::LineString(line) => Shape::LineString(line_string(line)?),
        Value::MultiLineString(lines) => Shape::MultiLineString(MultiLineString::new(
            lines.iter().map(|l| line_string(l)).collect::<Result<_, _>>()?,
        )),
        Value::Polygon(rings) => Shape::Polygon(polygon(rings)?),
        Value::MultiPolygon(polygons) => Shape::MultiPolygon(MultiPolygon::new(
            polygons
                .iter()
                .map(|p| polygon(p))
                .collect::<Result<_, _>>()?,
        )),
        Value::GeometryCollection(_) => {
            return Err(SourceError::UnsupportedGeometry(
                "GeometryCollection".to_string(),
            ))
        }
    })
}

fn position(p: &[f64]) -> Result<Coord, SourceError> {
    match p {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(SourceError::InvalidGeometry(format!(
            "position with {} values, expected at least 2",
            p.len()
        ))),
    }
}

fn line_string(points: &[Vec<f64>]) -> Result<LineString, SourceError> {
    Ok(LineString::new(
        points
            .iter()
            .map(|p| position(p))
            .collect::<Result<_, _>>()?,
    ))
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, SourceError> {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => line_string(ring)?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings.map(|r| line_string(r)).collect::<Result<_, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}
