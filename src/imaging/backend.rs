//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait splits the engine's work into the individual
//! steps the pipeline must perform in a fixed order: identify (header only),
//! read orientation, decode, orient, resize, encode. Keeping each step
//! separate makes the "probe before decode" and "orient then strip"
//! disciplines visible in [`operations`](super::operations) instead of
//! hiding them inside one codec call.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust decoders,
//! with mozjpeg and libwebp bundled for lossy encoding.

use super::orientation::Orientation;
use super::params::{EncodeParams, ResizeParams};
use crate::types::ImageMime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Image(#[from] image::ImageError),
    #[error("PNG encode failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Result of a header-only identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identified {
    pub dimensions: Dimensions,
    pub format: ImageMime,
}

/// Trait for image processing backends.
///
/// `Image` is the backend's in-memory raster. It carries pixels only: once
/// [`decode`](Self::decode) returns, every container-level metadata block
/// (EXIF, XMP, ICC, text chunks) has been dropped.
pub trait ImageBackend: Sync {
    type Image;

    /// Read width, height and container format from the header without
    /// allocating a raster.
    fn identify(&self, data: &[u8]) -> Result<Identified, BackendError>;

    /// Read the EXIF orientation tag. Missing or unreadable EXIF is `Normal`.
    fn read_orientation(&self, data: &[u8]) -> Orientation;

    /// Fully decode to a raster, refusing anything wider or taller than
    /// `max_dimension`.
    fn decode(&self, data: &[u8], max_dimension: u32) -> Result<Self::Image, BackendError>;

    /// Bake an orientation into the raster.
    fn orient(&self, image: Self::Image, orientation: Orientation) -> Self::Image;

    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resize to exact dimensions with a high-quality filter.
    fn resize(&self, image: Self::Image, params: &ResizeParams)
    -> Result<Self::Image, BackendError>;

    /// Encode the raster. The output carries no metadata.
    fn encode(&self, image: &Self::Image, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
