//! The compression engine.
//!
//! Combines the pure [`calculations`](super::calculations) with backend
//! execution. One call is one pass: decode, orient, strip, fit, encode,
//! wrap, size-check. There is no retry at lower quality; a result over the
//! ceiling is an error the caller can act on.

use super::backend::ImageBackend;
use super::calculations::fit_inside;
use super::params::{EncodeParams, Quality, ResizeParams};
use crate::error::PipelineError;
use crate::types::{CompressedArtifact, CompressionOptions, ImageMetadata, Limits};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Compress a probed image into a size-checked data URI artifact.
pub fn compress(
    backend: &impl ImageBackend,
    data: &[u8],
    metadata: &ImageMetadata,
    options: &CompressionOptions,
    limits: &Limits,
) -> Result<CompressedArtifact, PipelineError> {
    // Orientation is read from the container before decoding; the decoded
    // raster carries no metadata at all.
    let orientation = backend.read_orientation(data);
    let image = backend.decode(data, limits.max_dimension)?;
    let image = backend.orient(image, orientation);
    debug!(
        format = %metadata.declared_format,
        width = metadata.width,
        height = metadata.height,
        ?orientation,
        "decoded and oriented"
    );

    let current = backend.dimensions(&image);
    let (width, height) = fit_inside(
        (current.width, current.height),
        (options.max_width, options.max_height),
    );
    let image = if (width, height) != (current.width, current.height) {
        debug!(width, height, "resizing to fit");
        backend.resize(image, &ResizeParams { width, height })?
    } else {
        image
    };

    let params = EncodeParams {
        format: options.format,
        quality: Quality::new(options.quality.value()),
    };
    let encoded = backend.encode(&image, &params)?;

    let artifact = CompressedArtifact {
        mime_type: options.format.mime_type(),
        base64_payload: STANDARD.encode(&encoded),
    };
    let size = artifact.encoded_len();
    debug!(
        format = %options.format,
        encoded_bytes = encoded.len(),
        data_uri_bytes = size,
        "encoded"
    );

    if size > limits.max_artifact_bytes {
        return Err(PipelineError::StillTooLargeAfterCompression {
            size,
            max: limits.max_artifact_bytes,
        });
    }
    Ok(artifact)
}
