//! Payload validation: syntactic and size checks before any decode.
//!
//! A submission is a data URI, `data:image/<tag>;base64,<body>`. The checks
//! run in a fixed order and stop at the first failure:
//!
//! 1. non-empty input, else [`InvalidData`](PipelineError::InvalidData)
//! 2. a recognized envelope prefix (`jpeg`, `jpg`, `png`, `gif`, `webp`),
//!    else [`UnsupportedFormat`](PipelineError::UnsupportedFormat)
//! 3. a non-empty body made only of the base64 alphabet,
//!    else [`CorruptData`](PipelineError::CorruptData)
//! 4. an estimated decoded size within the payload limit,
//!    else [`TooLarge`](PipelineError::TooLarge)
//! 5. a body that actually decodes, else `CorruptData`
//!
//! The size estimate comes from the base64 length alone, so an oversized
//! payload is never decoded.

use crate::error::PipelineError;
use crate::imaging::calculations::{bytes_to_mb, estimated_decoded_bytes};
use crate::types::{ImageMime, Limits, ValidatedPayload};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

const ENVELOPE_START: &str = "data:image/";
const ENVELOPE_END: &str = ";base64,";

/// Split a data URI into its declared format and base64 body.
///
/// Returns `None` when the prefix is missing or names a format outside the
/// allowed set. Matching is case-sensitive.
pub fn split_envelope(payload: &str) -> Option<(ImageMime, &str)> {
    let rest = payload.strip_prefix(ENVELOPE_START)?;
    let (tag, body) = rest.split_once(ENVELOPE_END)?;
    ImageMime::from_envelope_tag(tag).map(|mime| (mime, body))
}

fn is_base64_alphabet(body: &str) -> bool {
    body.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

/// Estimated decoded size of a base64 body, in MB.
pub fn estimated_size_mb(body: &str) -> f64 {
    bytes_to_mb(estimated_decoded_bytes(body.len()))
}

/// Run the syntactic checks without decoding.
///
/// Returns the declared format, the base64 body and its estimated size.
/// The fallback path stops here.
pub fn check_envelope<'a>(
    payload: &'a str,
    limits: &Limits,
) -> Result<(ImageMime, &'a str, f64), PipelineError> {
    if payload.is_empty() {
        return Err(PipelineError::InvalidData);
    }

    let (mime, body) = split_envelope(payload).ok_or(PipelineError::UnsupportedFormat)?;

    if body.is_empty() || !is_base64_alphabet(body) {
        return Err(PipelineError::CorruptData);
    }

    let size_mb = estimated_size_mb(body);
    if size_mb > limits.max_payload_mb {
        return Err(PipelineError::TooLarge {
            size_mb,
            max_mb: limits.max_payload_mb,
        });
    }

    Ok((mime, body, size_mb))
}

/// Validate a submission and decode its body.
pub fn validate(payload: &str, limits: &Limits) -> Result<ValidatedPayload, PipelineError> {
    let (mime, body, decoded_size_mb) = check_envelope(payload, limits)?;
    let bytes = STANDARD
        .decode(body)
        .map_err(|_| PipelineError::CorruptData)?;

    debug!(%mime, decoded_size_mb, bytes = bytes.len(), "payload accepted");
    Ok(ValidatedPayload {
        mime,
        decoded_size_mb,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionKind;

    fn kind(payload: &str) -> RejectionKind {
        validate(payload, &Limits::default()).unwrap_err().kind()
    }

    #[test]
    fn accepts_every_allowed_tag() {
        for tag in ["jpeg", "jpg", "png", "gif", "webp"] {
            let payload = format!("data:image/{tag};base64,Zm9vYmFy");
            let v = validate(&payload, &Limits::default()).unwrap();
            assert_eq!(v.bytes, b"foobar");
        }
    }

    #[test]
    fn jpg_envelope_normalizes_to_jpeg() {
        let v = validate("data:image/jpg;base64,Zm9v", &Limits::default()).unwrap();
        assert_eq!(v.mime, ImageMime::Jpeg);
    }

    #[test]
    fn empty_input_is_invalid_data() {
        assert_eq!(kind(""), RejectionKind::InvalidData);
    }

    #[test]
    fn whitespace_only_input_has_no_prefix() {
        for payload in [" ", "\n", "  \t", "   \n"] {
            assert_eq!(kind(payload), RejectionKind::UnsupportedFormat);
        }
    }

    #[test]
    fn bmp_envelope_is_unsupported() {
        assert_eq!(kind("data:image/bmp;base64,Zm9v"), RejectionKind::UnsupportedFormat);
    }

    #[test]
    fn missing_or_malformed_prefix_is_unsupported() {
        assert_eq!(kind("Zm9vYmFy"), RejectionKind::UnsupportedFormat);
        assert_eq!(kind("data:text/plain;base64,Zm9v"), RejectionKind::UnsupportedFormat);
        assert_eq!(kind("data:image/png,Zm9v"), RejectionKind::UnsupportedFormat);
        assert_eq!(kind("data:image/svg+xml;base64,Zm9v"), RejectionKind::UnsupportedFormat);
    }

    #[test]
    fn envelope_match_is_case_sensitive() {
        assert_eq!(kind("data:image/PNG;base64,Zm9v"), RejectionKind::UnsupportedFormat);
        assert_eq!(kind("DATA:image/png;base64,Zm9v"), RejectionKind::UnsupportedFormat);
    }

    #[test]
    fn non_alphabet_body_is_corrupt() {
        assert_eq!(kind("data:image/png;base64,Zm9v!!"), RejectionKind::CorruptData);
        assert_eq!(kind("data:image/png;base64,Zm9v YmFy"), RejectionKind::CorruptData);
        assert_eq!(kind("data:image/png;base64,Zm9v-_"), RejectionKind::CorruptData);
    }

    #[test]
    fn empty_body_is_corrupt() {
        assert_eq!(kind("data:image/png;base64,"), RejectionKind::CorruptData);
    }

    #[test]
    fn undecodable_body_is_corrupt() {
        // Alphabet-clean but padding in the middle
        assert_eq!(kind("data:image/png;base64,Zm=9v"), RejectionKind::CorruptData);
        assert_eq!(kind("data:image/png;base64,Z"), RejectionKind::CorruptData);
    }

    #[test]
    fn oversized_payload_reports_estimated_size() {
        // 10_000_000 chars → 7_500_000 bytes ≈ 7.15 MB
        let body = "A".repeat(10_000_000);
        let payload = format!("data:image/jpeg;base64,{body}");
        match validate(&payload, &Limits::default()).unwrap_err() {
            PipelineError::TooLarge { size_mb, max_mb } => {
                let expected = 10_000_000.0 * 3.0 / 4.0 / (1024.0 * 1024.0);
                assert!((size_mb - expected).abs() < 0.01);
                assert_eq!(max_mb, 5.0);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[test]
    fn payload_at_the_limit_is_accepted() {
        // Exactly 5 MiB decoded
        let body = "A".repeat(5 * 1024 * 1024 / 3 * 4);
        let payload = format!("data:image/png;base64,{body}");
        assert!(validate(&payload, &Limits::default()).is_ok());
    }

    #[test]
    fn custom_limit_is_honoured() {
        let limits = Limits {
            max_payload_mb: 0.000_001,
            ..Limits::default()
        };
        let err = validate("data:image/png;base64,Zm9vYmFy", &limits).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::TooLarge);
    }

    #[test]
    fn check_envelope_does_not_decode() {
        // Passes the syntactic checks even though it would not decode
        let (mime, body, _) =
            check_envelope("data:image/gif;base64,Z", &Limits::default()).unwrap();
        assert_eq!(mime, ImageMime::Gif);
        assert_eq!(body, "Z");
    }
}
