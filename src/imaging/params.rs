//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the engine in [`operations`](super::operations) (which
//! decides whether to resize and how to encode) and the
//! [`backend`](super::backend) (which does the pixel work). Keeping them
//! separate lets the engine run against a recording mock in tests.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1-100, default 85), clamped on construction.
//! - [`ResizeParams`]: exact output dimensions for a resize.
//! - [`EncodeParams`]: output format and quality for the final encode.

use crate::types::OutputFormat;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Parameters for a resize to exact dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
}

/// Parameters for the final encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    pub quality: Quality,
}
