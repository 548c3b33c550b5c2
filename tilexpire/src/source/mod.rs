//! Vector data sources.
//!
//! A source is a named collection of layers. Each layer carries its spatial
//! reference (if it declares one) and the raw GeoJSON geometries of its
//! features. Geometries are converted to [`Shape`](crate::geometry::Shape)
//! lazily by [`to_shape`], so an unsupported kind fails at the feature that
//! holds it.

mod convert;
mod document;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::SpatialRef;

pub use convert::to_shape;
pub use document::GeoJsonSource;

/// Errors from opening a source or converting its geometries.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid GeoJSON
    #[error("Invalid GeoJSON in {name}: {message}")]
    Parse { name: String, message: String },

    /// A geometry kind the tile finder does not handle
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Positions that do not form a geometry
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// One layer of a vector source.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    /// `None` if the layer explicitly declares no reference system
    pub spatial_ref: Option<SpatialRef>,
    pub geometries: Vec<geojson::Geometry>,
}

impl Layer {
    pub fn new(
        name: impl Into<String>,
        spatial_ref: Option<SpatialRef>,
        geometries: Vec<geojson::Geometry>,
    ) -> Self {
        Self {
            name: name.into(),
            spatial_ref,
            geometries,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

/// A dataset made of layers of geometries.
pub trait VectorSource {
    /// Name used in log messages, usually the path it was opened from.
    fn name(&self) -> &str;

    fn layers(&self) -> &[Layer];
}

/// In-memory layers, mainly for tests and programmatic use.
impl VectorSource for Vec<Layer> {
    fn name(&self) -> &str {
        "memory"
    }

    fn layers(&self) -> &[Layer] {
        self
    }
}
