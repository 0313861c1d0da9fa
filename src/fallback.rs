//! Degraded path for environments without the image codecs.
//!
//! Runs the syntactic checks of [`validate`](crate::validate) and nothing
//! else: no decode, no re-encode, no output ceiling. The submitted payload is
//! returned unchanged. Small payloads (at or below
//! [`Limits::fallback_passthrough_mb`]) are assumed to have been shrunk
//! client-side already; larger ones still pass through, with a warning.

use crate::error::PipelineError;
use crate::types::{CompressionOptions, Limits};
use crate::validate::check_envelope;
use tracing::{debug, warn};

/// Validate a submission and return it untouched.
///
/// `options` are accepted for call-site symmetry with the primary path and
/// are not applied.
pub fn compress_fallback(
    payload: &str,
    _options: &CompressionOptions,
    limits: &Limits,
) -> Result<String, PipelineError> {
    let (mime, _body, size_mb) = check_envelope(payload, limits)?;

    if size_mb <= limits.fallback_passthrough_mb {
        debug!(%mime, size_mb, "fallback pass-through");
    } else {
        warn!(
            %mime,
            size_mb,
            threshold_mb = limits.fallback_passthrough_mb,
            "fallback returning payload above pass-through threshold without compression"
        );
    }
    Ok(payload.to_string())
}
