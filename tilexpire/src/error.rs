//! Run-level error type.

use std::io;

use thiserror::Error;

use crate::geometry::ProjectionError;
use crate::source::SourceError;

/// Errors that abort an expiry run.
#[derive(Debug, Error)]
pub enum ExpireError {
    /// Reading or converting input geometries failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Input geometries could not be brought into Web Mercator
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Writing the tile list failed
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for expiry runs.
pub type ExpireResult<T> = Result<T, ExpireError>;
