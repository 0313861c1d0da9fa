//! EXIF orientation: read the tag, bake it into the pixels.
//!
//! This is the only EXIF field the pipeline looks at. After
//! [`Orientation::apply`] the raster is displayed upright without any
//! metadata, so the encoder can drop the EXIF block (GPS, camera serials,
//! timestamps) entirely.

use exif::{In, Reader, Tag};
use image::DynamicImage;
use std::io::Cursor;

/// The eight EXIF orientation values.
///
/// | EXIF | Variant | Fix applied |
/// |---|---|---|
/// | 1 | `Normal` | none |
/// | 2 | `FlipHorizontal` | flip horizontal |
/// | 3 | `Rotate180` | rotate 180° |
/// | 4 | `FlipVertical` | flip vertical |
/// | 5 | `Transpose` | rotate 90° CW, flip horizontal |
/// | 6 | `Rotate90` | rotate 90° CW |
/// | 7 | `Transverse` | rotate 270° CW, flip horizontal |
/// | 8 | `Rotate270` | rotate 270° CW |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF value. Out-of-range values are treated as `Normal`.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// Read the orientation tag from an encoded image container.
    pub fn read(data: &[u8]) -> Self {
        let Ok(exif) = Reader::new().read_from_container(&mut Cursor::new(data)) else {
            return Self::Normal;
        };
        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Self::from_exif)
            .unwrap_or_default()
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => img,
            Self::FlipHorizontal => img.fliph(),
            Self::Rotate180 => img.rotate180(),
            Self::FlipVertical => img.flipv(),
            Self::Transpose => img.rotate90().fliph(),
            Self::Rotate90 => img.rotate90(),
            Self::Transverse => img.rotate270().fliph(),
            Self::Rotate270 => img.rotate270(),
        }
    }
}
