//! Pure calculation functions for sizes and dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Estimate the decoded size of a base64 body from its length.
///
/// Uses `len * 3 / 4`, ignoring padding, so the estimate may overshoot the
/// real size by up to two bytes.
pub fn estimated_decoded_bytes(base64_len: usize) -> usize {
    base64_len / 4 * 3 + (base64_len % 4) * 3 / 4
}

/// Convert a byte count to megabytes (MiB).
pub fn bytes_to_mb(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Calculate "fit inside" dimensions for a bounding box.
///
/// The image is scaled down, preserving aspect ratio, until both sides fit
/// within `bounds`. Images already inside the box are returned unchanged:
/// this never enlarges.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (max width, max height)
///
/// # Returns
/// * `(width, height)` - Output dimensions; the limiting side equals its bound
///
/// # Examples
/// ```
/// # use avatar_press::imaging::calculations::fit_inside;
/// assert_eq!(fit_inside((2000, 1000), (800, 800)), (800, 400));
/// assert_eq!(fit_inside((300, 200), (800, 800)), (300, 200));
/// ```
pub fn fit_inside(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = (bounds.0.max(1), bounds.1.max(1));

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the limiting side
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w, h.clamp(1, max_h))
    } else {
        // Height is the limiting side
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.clamp(1, max_w), max_h)
    }
}

/// Number of palette entries used for PNG quantization at a given quality.
///
/// Scales linearly with quality, never below 16 colors.
pub fn palette_size(quality: u32) -> usize {
    let colors = (256.0 * quality.clamp(1, 100) as f64 / 100.0).round() as usize;
    colors.clamp(16, 256)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // size estimates
    // =========================================================================

    #[test]
    fn estimate_is_three_quarters_of_length() {
        assert_eq!(estimated_decoded_bytes(4), 3);
        assert_eq!(estimated_decoded_bytes(8), 6);
        assert_eq!(estimated_decoded_bytes(4_000_000), 3_000_000);
    }

    #[test]
    fn estimate_handles_partial_quads() {
        assert_eq!(estimated_decoded_bytes(6), 4);
        assert_eq!(estimated_decoded_bytes(0), 0);
    }

    #[test]
    fn bytes_to_mb_uses_binary_megabytes() {
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
        assert_eq!(bytes_to_mb(5 * 1024 * 1024), 5.0);
    }

    // =========================================================================
    // fit_inside
    // =========================================================================

    #[test]
    fn fit_landscape_clamps_width() {
        assert_eq!(fit_inside((2000, 1500), (800, 800)), (800, 600));
    }

    #[test]
    fn fit_portrait_clamps_height() {
        assert_eq!(fit_inside((1500, 2000), (800, 800)), (600, 800));
    }

    #[test]
    fn fit_square_source() {
        assert_eq!(fit_inside((2000, 2000), (800, 800)), (800, 800));
    }

    #[test]
    fn fit_never_enlarges() {
        assert_eq!(fit_inside((120, 90), (800, 800)), (120, 90));
        assert_eq!(fit_inside((800, 800), (800, 800)), (800, 800));
    }

    #[test]
    fn fit_one_side_over_bound() {
        // Only height exceeds: 700x1000 into 800x800 → 560x800
        assert_eq!(fit_inside((700, 1000), (800, 800)), (560, 800));
    }

    #[test]
    fn fit_non_square_bounds() {
        // 1000x1000 into 400x200 → height limits
        assert_eq!(fit_inside((1000, 1000), (400, 200)), (200, 200));
    }

    #[test]
    fn fit_preserves_aspect_within_a_pixel() {
        let (w, h) = fit_inside((1999, 1333), (800, 800));
        assert_eq!(w, 800);
        let expected_h = 1333.0 * 800.0 / 1999.0;
        assert!((h as f64 - expected_h).abs() <= 1.0);
    }

    #[test]
    fn fit_extreme_panorama_keeps_one_pixel() {
        assert_eq!(fit_inside((10_000, 50), (800, 800)), (800, 4));
        assert_eq!(fit_inside((10_000, 5), (100, 100)), (100, 1));
    }

    #[test]
    fn fit_zero_bounds_are_treated_as_one() {
        assert_eq!(fit_inside((100, 50), (0, 0)), (1, 1));
    }

    // =========================================================================
    // palette_size
    // =========================================================================

    #[test]
    fn palette_scales_with_quality() {
        assert_eq!(palette_size(100), 256);
        assert_eq!(palette_size(50), 128);
        assert_eq!(palette_size(85), 218);
    }

    #[test]
    fn palette_has_a_floor() {
        assert_eq!(palette_size(1), 16);
        assert_eq!(palette_size(0), 16);
    }
}
