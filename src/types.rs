//! Data model shared by every pipeline stage.
//!
//! Values flow one way: an untrusted payload string becomes a
//! [`ValidatedPayload`], which is probed into [`ImageMetadata`], which the
//! engine turns into a [`CompressedArtifact`]. None of these are retained
//! by the pipeline after a call returns.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image formats accepted in a submission envelope.
///
/// The envelope tag `jpg` is accepted and normalized to [`ImageMime::Jpeg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMime {
    /// Map an envelope tag (`data:image/<tag>;base64,`) to a format.
    pub fn from_envelope_tag(tag: &str) -> Option<Self> {
        match tag {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Map a container format detected by the decoder.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Encoding target for the compressed artifact.
///
/// Parsing is lenient: `jpg` maps to JPEG and any unrecognized name falls
/// back to JPEG as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "webp" => Self::Webp,
            _ => Self::Jpeg,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

impl From<String> for OutputFormat {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for OutputFormat {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.name().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-supplied compression settings. Never mutated by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionOptions {
    /// Bounding box width; larger images are shrunk to fit.
    pub max_width: u32,
    /// Bounding box height; larger images are shrunk to fit.
    pub max_height: u32,
    /// Lossy quality, 1–100.
    pub quality: Quality,
    pub format: OutputFormat,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: 800,
            max_height: 800,
            quality: Quality::default(),
            format: OutputFormat::Jpeg,
        }
    }
}

/// Safety bounds enforced by the validator, prober and engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Largest accepted estimated decoded payload, in MB.
    pub max_payload_mb: f64,
    /// Smallest accepted width or height, in pixels.
    pub min_dimension: u32,
    /// Largest accepted width or height, in pixels.
    pub max_dimension: u32,
    /// Ceiling on the final data URI, in bytes.
    pub max_artifact_bytes: usize,
    /// Payloads at or below this size (MB) pass through the fallback as-is.
    pub fallback_passthrough_mb: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_payload_mb: 5.0,
            min_dimension: 50,
            max_dimension: 10_000,
            max_artifact_bytes: 512 * 1024,
            fallback_passthrough_mb: 0.2,
        }
    }
}

/// A payload that passed every syntactic check, with its decoded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    pub mime: ImageMime,
    /// Estimated decoded size in MB, computed from the base64 length.
    pub decoded_size_mb: f64,
    pub bytes: Vec<u8>,
}

/// Header-level facts about a validated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Container format reported by the decoder, which may differ from the
    /// envelope's declared type.
    pub declared_format: ImageMime,
}

/// The result of a successful compression: encoded bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedArtifact {
    pub mime_type: &'static str,
    pub base64_payload: String,
}

impl CompressedArtifact {
    pub fn to_data_uri(&self) -> String {
        self.to_string()
    }

    /// Length of the full data URI in bytes.
    pub fn encoded_len(&self) -> usize {
        "data:".len() + self.mime_type.len() + ";base64,".len() + self.base64_payload.len()
    }
}

impl fmt::Display for CompressedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.base64_payload)
    }
}
