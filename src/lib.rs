//! # avatar-press
//!
//! Safe ingestion of untrusted profile pictures. A submitted data URI is
//! checked, probed and re-encoded into one small, metadata-free artifact, or
//! rejected with a typed reason.
//!
//! # Architecture: One-Way Pipeline
//!
//! ```text
//! 1. Validate  data URI   →  decoded bytes   (envelope, alphabet, size estimate)
//! 2. Probe     bytes      →  metadata        (header only, dimension bounds)
//! 3. Compress  bytes      →  artifact        (decode, orient, fit, encode, size gate)
//! ```
//!
//! Each stage is a plain function of its input. Nothing is cached and
//! nothing is retained between calls, so a [`Pipeline`] can be shared across
//! threads freely. The first failure ends the call; there are no retries and
//! no partial results.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`validate`] | Stage 1: envelope prefix, base64 alphabet, size estimate, decode |
//! | [`probe`] | Stage 2: header-only dimensions and bounds |
//! | [`imaging`] | Stage 3: the compression engine and its [`ImageBackend`](imaging::ImageBackend) |
//! | [`fallback`] | Validate-only pass-through for hosts without codecs |
//! | [`pipeline`] | Entry points composing the stages |
//! | [`naming`] | Filename sanitizing and secure name generation |
//! | [`config`] | `avatar-press.toml` loading, validation and merging |
//! | [`error`] | The rejection taxonomy |
//! | [`types`] | Data model shared between stages |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Probe Before Decode
//!
//! A few kilobytes of PNG can declare a 20000×15000 raster. Dimensions are
//! read from the container header and checked before any pixel buffer is
//! allocated; the full decode then runs under `image::Limits` as a second
//! guard.
//!
//! ## Orient, Then Strip
//!
//! The EXIF orientation tag is read, baked into the pixels, and every
//! metadata block is dropped with the container. GPS positions and camera
//! serials never reach the output.
//!
//! ## One Pass, Hard Ceiling
//!
//! The engine encodes once. A result above the output ceiling is an error,
//! never a silent re-encode at lower quality; the caller decides what to
//! retry with.
//!
//! ## Pure-Rust Decoding
//!
//! Every decoder comes from the `image` crate ecosystem, so untrusted bytes
//! are only ever parsed by Rust code. The lossy encoders (mozjpeg, libwebp)
//! are C libraries bundled at build time; they only see pixels the pipeline
//! produced itself.

pub mod config;
pub mod error;
pub mod fallback;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod types;
pub mod validate;

pub use error::{PipelineError, RejectionKind};
pub use naming::{generate_secure_filename, sanitize_filename};
pub use pipeline::{Pipeline, compress_profile_image, compress_profile_image_fallback};
pub use types::{CompressedArtifact, CompressionOptions, ImageMime, Limits, OutputFormat};
