//! Format-specific lossy encoders.
//!
//! | Format | Encoder | Settings |
//! |---|---|---|
//! | JPEG | `mozjpeg` | progressive scans, optimized Huffman coding |
//! | PNG | `color_quant` NeuQuant + `png` | palette sized by quality, best deflate, no filter |
//! | WebP | `webp` (libwebp) | lossy, method 6 (max effort) |
//!
//! None of the encoders write EXIF, XMP or ICC blocks.

use super::backend::BackendError;
use super::calculations::palette_size;
use super::params::{EncodeParams, Quality};
use crate::types::OutputFormat;
use color_quant::NeuQuant;
use image::DynamicImage;

/// libwebp `method`: 0 = fastest, 6 = slowest / smallest.
const WEBP_MAX_EFFORT: i32 = 6;

/// NeuQuant sampling factor: 1 = every pixel, 30 = fastest.
const NEUQUANT_SAMPLE_FACTOR: i32 = 10;

pub fn encode(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
    match params.format {
        OutputFormat::Jpeg => encode_jpeg(img, params.quality),
        OutputFormat::Png => encode_png(img, params.quality),
        OutputFormat::Webp => encode_webp(img, params.quality),
    }
}

pub fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality.value() as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb)?;
    Ok(comp.finish()?)
}

pub fn encode_png(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let quantizer = NeuQuant::new(
        NEUQUANT_SAMPLE_FACTOR,
        palette_size(quality.value()),
        rgba.as_raw(),
    );
    let indices: Vec<u8> = rgba
        .pixels()
        .map(|p| quantizer.index_of(&p.0) as u8)
        .collect();

    let color_map = quantizer.color_map_rgba();
    let mut palette = Vec::with_capacity(color_map.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(color_map.len() / 4);
    for entry in color_map.chunks_exact(4) {
        palette.extend_from_slice(&entry[..3]);
        alpha.push(entry[3]);
    }

    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette);
    if alpha.iter().any(|&a| a < u8::MAX) {
        encoder.set_trns(alpha);
    }
    encoder.set_compression(png::Compression::Best);
    encoder.set_filter(png::FilterType::NoFilter);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&indices)?;
    writer.finish()?;
    Ok(buf)
}

pub fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut config = webp::WebPConfig::new()
        .map_err(|_| BackendError::ProcessingFailed("WebP encoder init failed".into()))?;
    config.quality = quality.value() as f32;
    config.method = WEBP_MAX_EFFORT;

    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {e:?}")))?;
    Ok(memory.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn jpeg_roundtrips_dimensions() {
        let bytes = encode_jpeg(&gradient(120, 80), Quality::new(85)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn jpeg_is_progressive() {
        let bytes = encode_jpeg(&gradient(64, 64), Quality::new(85)).unwrap();
        // SOF2 marker = progressive DCT
        assert!(bytes.windows(2).any(|w| w == [0xFF, 0xC2]));
    }

    #[test]
    fn jpeg_lower_quality_is_smaller() {
        let img = gradient(200, 200);
        let high = encode_jpeg(&img, Quality::new(95)).unwrap();
        let low = encode_jpeg(&img, Quality::new(30)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn png_is_palette_based() {
        let bytes = encode_png(&gradient(100, 60), Quality::new(85)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);

        let decoder = png::Decoder::new(std::io::Cursor::new(&bytes));
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().color_type, png::ColorType::Indexed);
        assert_eq!(reader.info().width, 100);
        assert_eq!(reader.info().height, 60);
    }

    #[test]
    fn png_keeps_transparency() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }));
        let bytes = encode_png(&img, Quality::new(85)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert!(decoded.get_pixel(0, 0)[3] > 224);
        assert!(decoded.get_pixel(63, 0)[3] < 32);
    }

    #[test]
    fn webp_roundtrips_dimensions() {
        let bytes = encode_webp(&gradient(90, 70), Quality::new(80)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (90, 70));
    }

    #[test]
    fn dispatch_follows_format() {
        let img = gradient(60, 60);
        for (format, expected) in [
            (OutputFormat::Jpeg, ImageFormat::Jpeg),
            (OutputFormat::Png, ImageFormat::Png),
            (OutputFormat::Webp, ImageFormat::WebP),
        ] {
            let bytes = encode(
                &img,
                &EncodeParams {
                    format,
                    quality: Quality::default(),
                },
            )
            .unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), expected);
        }
    }
}
