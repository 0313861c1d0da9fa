//! Orchestration: validate → probe → compress, all or nothing.
//!
//! A [`Pipeline`] owns its backend and limits and nothing else. Calls share
//! no mutable state, so one pipeline can serve any number of threads.

use crate::error::PipelineError;
use crate::fallback;
use crate::imaging::{self, ImageBackend, RustBackend};
use crate::probe::probe;
use crate::types::{CompressedArtifact, CompressionOptions, Limits};
use crate::validate::validate;
use tracing::warn;

pub struct Pipeline<B: ImageBackend = RustBackend> {
    backend: B,
    limits: Limits,
}

impl Pipeline<RustBackend> {
    pub fn new() -> Self {
        Self::with_backend(RustBackend::new())
    }
}

impl Default for Pipeline<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend> Pipeline<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            limits: Limits::default(),
        }
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the full pipeline and return the artifact.
    pub fn compress(
        &self,
        payload: &str,
        options: &CompressionOptions,
    ) -> Result<CompressedArtifact, PipelineError> {
        let result = validate(payload, &self.limits).and_then(|validated| {
            let metadata = probe(&self.backend, &validated.bytes, &self.limits)?;
            imaging::compress(
                &self.backend,
                &validated.bytes,
                &metadata,
                options,
                &self.limits,
            )
        });
        if let Err(e) = &result {
            warn!(kind = ?e.kind(), "rejected: {e}");
        }
        result
    }

    /// Run the full pipeline and return the data URI.
    pub fn compress_profile_image(
        &self,
        payload: &str,
        options: &CompressionOptions,
    ) -> Result<String, PipelineError> {
        self.compress(payload, options).map(|a| a.to_data_uri())
    }

    /// Degraded path: validate only, return the payload unchanged.
    pub fn compress_profile_image_fallback(
        &self,
        payload: &str,
        options: &CompressionOptions,
    ) -> Result<String, PipelineError> {
        fallback::compress_fallback(payload, options, &self.limits)
    }
}

/// Compress a profile image with the default backend and limits.
///
/// ```no_run
/// use avatar_press::{CompressionOptions, compress_profile_image};
///
/// # let submitted = String::new();
/// let uri = compress_profile_image(&submitted, &CompressionOptions::default())?;
/// assert!(uri.starts_with("data:image/jpeg;base64,"));
/// # Ok::<(), avatar_press::PipelineError>(())
/// ```
pub fn compress_profile_image(
    payload: &str,
    options: &CompressionOptions,
) -> Result<String, PipelineError> {
    Pipeline::new().compress_profile_image(payload, options)
}

/// Validate a profile image and return it unchanged. No size ceiling applies.
pub fn compress_profile_image_fallback(
    payload: &str,
    options: &CompressionOptions,
) -> Result<String, PipelineError> {
    Pipeline::new().compress_profile_image_fallback(payload, options)
}
