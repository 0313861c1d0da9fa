//! Production image backend built on the `image` crate ecosystem.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify (header only) | `image::ImageReader::into_dimensions` |
//! | Orientation | `kamadak-exif` (Orientation tag only) |
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate decoders, with `image::Limits` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | see [`encode`](super::encode) |
//!
//! The decode allocation cap is sized for the largest accepted raster: a
//! `max_dimension` square at 16-bit RGBA, 8 bytes per pixel. It replaces the
//! `image` default of 512 MiB.

use super::backend::{BackendError, Dimensions, Identified, ImageBackend};
use super::encode;
use super::orientation::Orientation;
use super::params::{EncodeParams, ResizeParams};
use crate::types::ImageMime;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits};
use std::io::Cursor;

/// Backend using the `image` crate for decoding and resampling.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes per pixel of the widest decoded layout (`Rgba16`).
const MAX_BYTES_PER_PIXEL: u64 = 8;

fn decode_limits(max_dimension: u32) -> Limits {
    let side = u64::from(max_dimension);
    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    limits.max_alloc = Some(side.saturating_mul(side).saturating_mul(MAX_BYTES_PER_PIXEL));
    limits
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    Ok(ImageReader::new(Cursor::new(data)).with_guessed_format()?)
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn identify(&self, data: &[u8]) -> Result<Identified, BackendError> {
        let mut reader = reader(data)?;
        let format = reader
            .format()
            .and_then(ImageMime::from_image_format)
            .ok_or_else(|| BackendError::ProcessingFailed("Unrecognized image container".into()))?;

        // Header parsing only; the allocation limits would otherwise refuse
        // to even report the dimensions of a very large image.
        reader.no_limits();
        let (width, height) = reader.into_dimensions()?;
        Ok(Identified {
            dimensions: Dimensions { width, height },
            format,
        })
    }

    fn read_orientation(&self, data: &[u8]) -> Orientation {
        Orientation::read(data)
    }

    fn decode(&self, data: &[u8], max_dimension: u32) -> Result<DynamicImage, BackendError> {
        let mut reader = reader(data)?;
        reader.limits(decode_limits(max_dimension));
        Ok(reader.decode()?)
    }

    fn orient(&self, image: DynamicImage, orientation: Orientation) -> DynamicImage {
        orientation.apply(image)
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions {
            width: image.width(),
            height: image.height(),
        }
    }

    fn resize(
        &self,
        image: DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, BackendError> {
        Ok(image.resize_exact(params.width, params.height, FilterType::Lanczos3))
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        encode::encode(image, params)
    }
}
