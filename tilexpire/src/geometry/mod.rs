//! Geometry model and the working projection.
//!
//! All tile math happens in the Web Mercator plane. Source geometries are
//! converted into [`Shape`] values and reprojected with a
//! [`WorkingProjection`] built for their layer.

mod projection;
mod shape;

pub use projection::{ProjectionError, SpatialRef, WorkingProjection};
pub use shape::Shape;
