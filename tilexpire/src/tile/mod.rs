//! Dirty tile bookkeeping.
//!
//! Tiles are collected at a single maximum zoom as 64-bit quadkeys
//! ([`quadkey`]). On output the sorted keys are collapsed into every coarser
//! zoom level in one pass ([`CollapsedTiles`]), so the coarser tile sets are
//! never built.
//!
//! ```text
//! add(x, y) ──► TileList (HashSet<u64> @ maxzoom)
//!                    │ into_tiles(minzoom)
//!                    ▼
//!               sort ─► CollapsedTiles ─► z=max, z=max-1, …, z=min
//! ```

mod list;
pub mod quadkey;

pub use list::{CollapsedTiles, TileList};
