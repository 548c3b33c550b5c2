//! Run orchestration: settings resolution, bounding box path, geometry path,
//! trailer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tilexpire::config::{ConfigFile, ExpireConfig};
use tilexpire::coord::{bbox_tiles, BoundingBox, MAX_ZOOM};
use tilexpire::finder::IntersectingTilesFinder;
use tilexpire::logging::init_logging;
use tilexpire::output::TileWriter;
use tilexpire::source::GeoJsonSource;
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::Args;

/// Everything a run needs, resolved from the config file and the flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: ExpireConfig,
    pub bbox: Option<BoundingBox>,
    pub geoms: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: u64,
    pub skipped: u64,
}

/// Parses the config file, applies the flags on top and validates the result.
///
/// Returns the settings plus warnings for combinations that are accepted but
/// probably unintended.
pub fn resolve(args: &Args) -> Result<(Settings, Vec<String>), CliError> {
    let mut warnings = Vec::new();
    let mut config = ExpireConfig::default();
    if let Some(path) = &args.config {
        if !path.exists() {
            warnings.push(format!(
                "Config file {} not found, using defaults",
                path.display()
            ));
        }
        config = ConfigFile::load_from(path)?.apply_to(config);
    }

    if let Some(v) = args.minzoom {
        config.minzoom = v;
    }
    if let Some(v) = args.maxzoom {
        config.maxzoom = v;
    }
    if let Some(v) = args.buffer_size {
        config.buffer_size = v;
    }
    if let Some(v) = &args.suffix {
        if v.is_empty() {
            return Err(CliError::Config("File name suffix is empty".to_string()));
        }
        config.suffix = v.clone();
    }
    if let Some(v) = &args.directory {
        config.directory = Some(v.clone());
    }
    if let Some(v) = &args.append {
        config.trailer = Some(v.clone());
    }
    config.check_exists |= args.check_exists;
    config.null_delimiter |= args.null;
    config.tirex |= args.tirex;

    if args.bbox.is_none() && args.geoms.is_empty() {
        return Err(CliError::Config(
            "Either --bbox or --geom must be given".to_string(),
        ));
    }
    if config.maxzoom > MAX_ZOOM {
        return Err(CliError::Config(format!(
            "Maximum zoom level {} is above {}",
            config.maxzoom, MAX_ZOOM
        )));
    }
    if config.minzoom > config.maxzoom {
        return Err(CliError::Config(format!(
            "Minimum zoom level {} is above maximum zoom level {}",
            config.minzoom, config.maxzoom
        )));
    }
    if !config.buffer_size.is_finite() || config.buffer_size < 0.0 {
        return Err(CliError::Config(format!(
            "Buffer size must not be negative (got {})",
            config.buffer_size
        )));
    }

    if !config.suffix.is_empty() && !config.suffix.starts_with('.') {
        warnings.push(format!(
            "Suffix '{}' does not start with a dot",
            config.suffix
        ));
    }
    if config.check_exists && config.suffix.is_empty() {
        warnings.push("Checking tiles for existence but the suffix is empty".to_string());
    }
    if config.tirex && (config.check_exists || config.directory.is_some()) {
        warnings.push("--directory and --check-exists have no effect in tirex mode".to_string());
    }
    let settings = Settings {
        config,
        bbox: args.bbox,
        geoms: args.geoms.clone(),
        output: args.output.clone(),
    };
    Ok((settings, warnings))
}

/// Writes the complete tile list of a run to `out`.
///
/// The bounding box tiles come first, then the tiles of all geometry files,
/// then the trailer.
pub fn write_tiles<W: Write>(settings: &Settings, out: W) -> Result<RunSummary, CliError> {
    let config = &settings.config;
    let (minzoom, maxzoom) = config.effective_zooms();
    let mut writer = TileWriter::new(out, config);

    if let Some(bbox) = settings.bbox {
        debug!(?bbox, minzoom, maxzoom, "Writing bounding box tiles");
        writer
            .write_tiles(bbox_tiles(bbox, minzoom, maxzoom))
            .map_err(|e| write_error(settings, e))?;
    }

    if !settings.geoms.is_empty() {
        let mut finder = IntersectingTilesFinder::new(minzoom, maxzoom);
        for path in &settings.geoms {
            let source = GeoJsonSource::open(path)?;
            finder.find_intersections(&source, config.buffer_size)?;
        }
        info!(
            tiles = finder.tile_count(),
            zoom = maxzoom,
            "Dumping tiles on all zoom levels"
        );
        writer
            .write_tiles(finder.finish())
            .map_err(|e| write_error(settings, e))?;
    }

    if let Some(trailer) = &config.trailer {
        writer
            .write_trailer(trailer)
            .map_err(|e| write_error(settings, e))?;
    }

    let summary = RunSummary {
        written: writer.written(),
        skipped: writer.skipped(),
    };
    writer.finish().map_err(|e| write_error(settings, e))?;
    Ok(summary)
}

/// Entry point of the binary.
pub fn run(args: Args) -> Result<(), CliError> {
    init_logging(args.verbose).map_err(|e| CliError::LoggingInit(e.to_string()))?;
    debug!("Tilexpire v{}", tilexpire::VERSION);

    let (settings, warnings) = resolve(&args)?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    let summary = match &settings.output {
        Some(path) => {
            let file = File::create(path).map_err(|error| CliError::FileWrite {
                path: path.display().to_string(),
                error,
            })?;
            write_tiles(&settings, BufWriter::new(file))?
        }
        None => write_tiles(&settings, BufWriter::new(io::stdout().lock()))?,
    };

    debug!(
        written = summary.written,
        skipped = summary.skipped,
        "Run complete"
    );
    Ok(())
}

fn write_error(settings: &Settings, error: io::Error) -> CliError {
    let path = settings
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdout>".to_string());
    CliError::FileWrite { path, error }
}
