//! Image processing: header probe, orientation, resize and lossy encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` (header only) |
//! | **Orientation** | `kamadak-exif`, Orientation tag only |
//! | **Decode** | `image` decoders under `image::Limits` |
//! | **Resize** | Lanczos3, fit inside, never enlarge |
//! | **Encode** | `mozjpeg`, `color_quant` + `png`, `webp` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for size and dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The compression engine combining calculations + backend

pub mod backend;
pub mod calculations;
pub mod encode;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, Identified, ImageBackend};
pub use operations::compress;
pub use orientation::Orientation;
pub use params::{EncodeParams, Quality, ResizeParams};
pub use rust_backend::RustBackend;
