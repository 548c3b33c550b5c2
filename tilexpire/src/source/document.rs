//! GeoJSON files as vector sources.

use std::fs;
use std::path::Path;

use geojson::GeoJson;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{Layer, SourceError, VectorSource};
use crate::geometry::SpatialRef;

/// A GeoJSON document exposed as a single-layer source.
///
/// A FeatureCollection, a single Feature or a bare Geometry all become one
/// layer. Features without a geometry are ignored.
///
/// The layer's spatial reference comes from the legacy top-level `crs`
/// member:
///
/// - no `crs` member: WGS84, as RFC 7946 requires
/// - `"crs": null`: no spatial reference
/// - `{"type": "name", "properties": {"name": ...}}`: looked up with
///   [`SpatialRef::from_name`]
/// - `{"type": "EPSG", "properties": {"code": ...}}`: treated as `EPSG:<code>`
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    name: String,
    layers: Vec<Layer>,
}

impl GeoJsonSource {
    /// Reads and parses a GeoJSON file. The layer is named after the file stem.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let layer_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let source = Self::from_json(&path.display().to_string(), &layer_name, &text)?;

        debug!(
            path = %path.display(),
            features = source.layers.iter().map(Layer::feature_count).sum::<usize>(),
            "Opened GeoJSON source"
        );
        Ok(source)
    }

    /// Parses GeoJSON text into a source named `name` with one layer named
    /// `layer_name`.
    pub fn from_json(name: &str, layer_name: &str, text: &str) -> Result<Self, SourceError> {
        let parse_error = |message: String| SourceError::Parse {
            name: name.to_string(),
            message,
        };

        let json: JsonValue = serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?;
        let spatial_ref = spatial_ref_of(&json);
        let document = GeoJson::from_json_value(json).map_err(|e| parse_error(e.to_string()))?;

        let geometries = match document {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .collect(),
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::Geometry(geometry) => vec![geometry],
        };

        Ok(Self {
            name: name.to_string(),
            layers: vec![Layer::new(layer_name, spatial_ref, geometries)],
        })
    }
}

impl VectorSource for GeoJsonSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

fn spatial_ref_of(json: &JsonValue) -> Option<SpatialRef> {
    let crs = match json.get("crs") {
        None => return Some(SpatialRef::Wgs84),
        Some(JsonValue::Null) => return None,
        Some(crs) => crs,
    };

    let properties = crs.get("properties");
    let declared = match crs.get("type").and_then(JsonValue::as_str) {
        Some("name") => properties
            .and_then(|p| p.get("name"))
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        Some("EPSG") => properties
            .and_then(|p| p.get("code"))
            .map(|code| match code {
                JsonValue::String(s) => format!("EPSG:{}", s),
                other => format!("EPSG:{}", other),
            }),
        _ => None,
    };

    Some(match declared {
        Some(name) => SpatialRef::from_name(&name),
        None => SpatialRef::Other(crs.to_string()),
    })
}
