//! Tilexpire - tile expiry lists for slippy-map tile caches
//!
//! Turns a bounding box or a set of changed geometries into the deduplicated
//! list of Web Mercator tiles that must be re-rendered, at every zoom level of
//! a range.
//!
//! # Example
//!
//! ```
//! use tilexpire::config::ExpireConfig;
//! use tilexpire::finder::IntersectingTilesFinder;
//! use tilexpire::output::TileWriter;
//! use tilexpire::source::GeoJsonSource;
//!
//! let source = GeoJsonSource::from_json(
//!     "inline",
//!     "changes",
//!     r#"{"type": "Point", "coordinates": [-0.1, 51.5]}"#,
//! )?;
//!
//! let config = ExpireConfig::new(10, 14).with_suffix(".png");
//! let mut finder = IntersectingTilesFinder::new(config.minzoom, config.maxzoom);
//! finder.find_intersections(&source, config.buffer_size)?;
//!
//! let mut writer = TileWriter::new(Vec::new(), &config);
//! writer.write_tiles(finder.finish())?;
//! let out = String::from_utf8(writer.finish()?)?;
//! assert_eq!(out.lines().next(), Some("14/8187/5448.png"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod finder;
pub mod geometry;
pub mod logging;
pub mod output;
pub mod source;
pub mod tile;

pub use error::{ExpireError, ExpireResult};

/// Version of the tilexpire library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
