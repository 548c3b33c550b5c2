//! The planar geometry kinds the tile finder accepts.

use geo::{
    BoundingRect, Buffer, Coord, Intersects, LineString, MapCoords, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Rect,
};

/// A planar geometry of one of the supported kinds.
///
/// Every operation matches exhaustively, so supporting another kind is a
/// compile-checked change.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    MultiPoint(MultiPoint),
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Shape {
    /// Short name of the geometry kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point(_) => "Point",
            Shape::MultiPoint(_) => "MultiPoint",
            Shape::LineString(_) => "LineString",
            Shape::MultiLineString(_) => "MultiLineString",
            Shape::Polygon(_) => "Polygon",
            Shape::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Axis-aligned bounding box, `None` for empty geometries.
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Shape::Point(g) => Some(g.bounding_rect()),
            Shape::MultiPoint(g) => g.bounding_rect(),
            Shape::LineString(g) => g.bounding_rect(),
            Shape::MultiLineString(g) => g.bounding_rect(),
            Shape::Polygon(g) => g.bounding_rect(),
            Shape::MultiPolygon(g) => g.bounding_rect(),
        }
    }

    /// Expands the geometry outward by `radius` plane units.
    ///
    /// The result is always polygonal.
    pub fn buffer(&self, radius: f64) -> Shape {
        let buffered = match self {
            Shape::Point(g) => g.buffer(radius),
            Shape::MultiPoint(g) => g.buffer(radius),
            Shape::LineString(g) => g.buffer(radius),
            Shape::MultiLineString(g) => g.buffer(radius),
            Shape::Polygon(g) => g.buffer(radius),
            Shape::MultiPolygon(g) => g.buffer(radius),
        };
        Shape::MultiPolygon(buffered)
    }

    /// Returns true if the geometry touches or overlaps `rect`.
    pub fn intersects(&self, rect: &Rect) -> bool {
        match self {
            Shape::Point(g) => g.intersects(rect),
            Shape::MultiPoint(g) => g.intersects(rect),
            Shape::LineString(g) => g.intersects(rect),
            Shape::MultiLineString(g) => g.intersects(rect),
            Shape::Polygon(g) => g.intersects(rect),
            Shape::MultiPolygon(g) => g.intersects(rect),
        }
    }

    /// Applies a fallible coordinate transformation to every vertex.
    pub fn try_map_coords<E>(
        &self,
        func: impl Fn(Coord) -> Result<Coord, E> + Copy,
    ) -> Result<Shape, E> {
        Ok(match self {
            Shape::Point(g) => Shape::Point(g.try_map_coords(func)?),
            Shape::MultiPoint(g) => Shape::MultiPoint(g.try_map_coords(func)?),
            Shape::LineString(g) => Shape::LineString(g.try_map_coords(func)?),
            Shape::MultiLineString(g) => Shape::MultiLineString(g.try_map_coords(func)?),
            Shape::Polygon(g) => Shape::Polygon(g.try_map_coords(func)?),
            Shape::MultiPolygon(g) => Shape::MultiPolygon(g.try_map_coords(func)?),
        })
    }
}

impl From<Point> for Shape {
    fn from(g: Point) -> Self {
        Shape::Point(g)
    }
}

impl From<MultiPoint> for Shape {
    fn from(g: MultiPoint) -> Self {
        Shape::MultiPoint(g)
    }
}

impl From<LineString> for Shape {
    fn from(g: LineString) -> Self {
        Shape::LineString(g)
    }
}

impl From<MultiLineString> for Shape {
    fn from(g: MultiLineString) -> Self {
        Shape::MultiLineString(g)
    }
}

impl From<Polygon> for Shape {
    fn from(g: Polygon) -> Self {
        Shape::Polygon(g)
    }
}

impl From<MultiPolygon> for Shape {
    fn from(g: MultiPolygon) -> Self {
        Shape::MultiPolygon(g)
    }
}
