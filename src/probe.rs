//! Header-only metadata probe.
//!
//! Reads width, height and container format without allocating a raster,
//! and enforces the dimension bounds. This is the decompression-bomb guard:
//! a few kilobytes of compressed data can declare a raster of gigabytes, so
//! oversized dimensions are rejected here, before the engine decodes.

use crate::error::PipelineError;
use crate::imaging::ImageBackend;
use crate::types::{ImageMetadata, Limits};
use tracing::debug;

/// Probe decoded payload bytes for their dimensions and enforce the bounds.
///
/// Any identify failure, and any zero-sized header, maps to
/// [`NoDimensions`](PipelineError::NoDimensions).
pub fn probe(
    backend: &impl ImageBackend,
    bytes: &[u8],
    limits: &Limits,
) -> Result<ImageMetadata, PipelineError> {
    let identified = backend.identify(bytes).map_err(|e| {
        debug!(error = %e, "header probe failed");
        PipelineError::NoDimensions
    })?;
    let (width, height) = (identified.dimensions.width, identified.dimensions.height);

    if width == 0 || height == 0 {
        return Err(PipelineError::NoDimensions);
    }
    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(PipelineError::DimensionsTooLarge {
            width,
            height,
            max: limits.max_dimension,
        });
    }
    if width < limits.min_dimension || height < limits.min_dimension {
        return Err(PipelineError::DimensionsTooSmall {
            width,
            height,
            min: limits.min_dimension,
        });
    }

    debug!(width, height, format = %identified.format, "probed");
    Ok(ImageMetadata {
        width,
        height,
        declared_format: identified.format,
    })
}
