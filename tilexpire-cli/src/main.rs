//! Tilexpire CLI - Command-line interface
//!
//! Prints the tiles touched by a bounding box or by the geometries of
//! GeoJSON files, one path per line, for every zoom level of a range.

mod error;
mod runner;

use std::path::PathBuf;

use clap::Parser;
use tilexpire::coord::BoundingBox;

#[derive(Parser, Debug, Default)]
#[command(name = "tilexpire", version)]
#[command(
    about = "Generate tile expiry lists from bounding boxes or geometries",
    long_about = None
)]
pub struct Args {
    /// Print this string after all tiles, followed by the delimiter
    #[arg(short = 'a', long, value_name = "STR")]
    pub append: Option<String>,

    /// Print every tile of this bounding box: min_lon,min_lat,max_lon,max_lat
    #[arg(short = 'b', long, value_name = "BBOX", allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Buffer around geometries in meters
    #[arg(short = 'B', long, value_name = "METERS", allow_negative_numbers = true)]
    pub buffer_size: Option<f64>,

    /// Only print tiles whose file exists (needs --suffix)
    #[arg(short = 'c', long)]
    pub check_exists: bool,

    /// Tile directory, prefixed to every path and used by --check-exists
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// GeoJSON file with changed geometries (repeatable)
    #[arg(short = 'g', long = "geom", value_name = "FILE")]
    pub geoms: Vec<PathBuf>,

    /// Separate entries with NUL instead of newline
    #[arg(short = 'n', long)]
    pub null: bool,

    /// Suffix appended to every tile path (include the leading dot)
    #[arg(short = 's', long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Print tirex metatile coordinates (multiples of 8)
    #[arg(short = 't', long)]
    pub tirex: bool,

    /// Lowest zoom level [default: 0]
    #[arg(short = 'z', long, value_name = "ZOOM")]
    pub minzoom: Option<u8>,

    /// Highest zoom level [default: 14]
    #[arg(short = 'Z', long, value_name = "ZOOM")]
    pub maxzoom: Option<u8>,

    /// Write to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log progress at debug level
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// INI file with default settings; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = runner::run(args) {
        e.exit();
    }
}
