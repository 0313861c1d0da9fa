//! Rejection taxonomy for the whole pipeline.
//!
//! Every failure is terminal for the call that raised it. The `Display`
//! strings are written to be shown to an end user as-is.

use crate::imaging::BackendError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid image data")]
    InvalidData,
    #[error("unsupported image format. Allowed: jpeg, jpg, png, gif, webp")]
    UnsupportedFormat,
    #[error("corrupt image data")]
    CorruptData,
    #[error("image too large ({size_mb:.1}MB). Maximum {max_mb}MB")]
    TooLarge { size_mb: f64, max_mb: f64 },
    #[error("could not read image dimensions")]
    NoDimensions,
    #[error("image dimensions too large ({width}x{height}). Maximum {max}px per side")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },
    #[error("image dimensions too small ({width}x{height}). Minimum {min}px per side")]
    DimensionsTooSmall { width: u32, height: u32, min: u32 },
    #[error("image processing failed: {0}")]
    ProcessingFailed(#[from] BackendError),
    #[error("image still too large after compression ({size} bytes). Maximum {max} bytes")]
    StillTooLargeAfterCompression { size: usize, max: usize },
}

/// Machine-readable name of a [`PipelineError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidData,
    UnsupportedFormat,
    CorruptData,
    TooLarge,
    NoDimensions,
    DimensionsTooLarge,
    DimensionsTooSmall,
    ProcessingFailed,
    StillTooLargeAfterCompression,
}

impl PipelineError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidData => RejectionKind::InvalidData,
            Self::UnsupportedFormat => RejectionKind::UnsupportedFormat,
            Self::CorruptData => RejectionKind::CorruptData,
            Self::TooLarge { .. } => RejectionKind::TooLarge,
            Self::NoDimensions => RejectionKind::NoDimensions,
            Self::DimensionsTooLarge { .. } => RejectionKind::DimensionsTooLarge,
            Self::DimensionsTooSmall { .. } => RejectionKind::DimensionsTooSmall,
            Self::ProcessingFailed(_) => RejectionKind::ProcessingFailed,
            Self::StillTooLargeAfterCompression { .. } => {
                RejectionKind::StillTooLargeAfterCompression
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_matches_user_facing_format() {
        let err = PipelineError::TooLarge {
            size_mb: 7.3,
            max_mb: 5.0,
        };
        assert_eq!(err.to_string(), "image too large (7.3MB). Maximum 5MB");
    }

    #[test]
    fn processing_failed_keeps_cause() {
        let err: PipelineError = BackendError::ProcessingFailed("bad huffman table".into()).into();
        assert_eq!(err.kind(), RejectionKind::ProcessingFailed);
        assert!(err.to_string().contains("bad huffman table"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&RejectionKind::StillTooLargeAfterCompression).unwrap();
        assert_eq!(json, "\"still_too_large_after_compression\"");
    }
}
