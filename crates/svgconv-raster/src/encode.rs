//! Image encoding for the supported output formats.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::consts::DEFAULT_JPEG_QUALITY;
use crate::error::RasterError;

/// Output format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// PNG, alpha preserved.
    Lossless,
    /// JPEG at the given quality (1-100). No alpha channel.
    Lossy {
        /// Encoder quality, clamped to 1-100.
        quality: u8,
    },
}

impl RasterFormat {
    /// JPG with the default quality.
    pub const DEFAULT_LOSSY: Self = Self::Lossy {
        quality: DEFAULT_JPEG_QUALITY,
    };

    /// Short uppercase name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Lossless => "PNG",
            Self::Lossy { .. } => "JPG",
        }
    }

    /// Quality for lossy formats.
    #[must_use]
    pub fn quality(self) -> Option<u8> {
        match self {
            Self::Lossless => None,
            Self::Lossy { quality } => Some(quality),
        }
    }

    /// Whether the format keeps an alpha channel.
    #[must_use]
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Lossless)
    }
}

/// Encode a rendered image into file bytes.
///
/// Lossy output drops the alpha channel; callers flatten onto an opaque
/// background first.
pub fn encode(image: RgbaImage, format: RasterFormat) -> Result<Vec<u8>, RasterError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    match format {
        RasterFormat::Lossless => {
            image
                .write_to(&mut cursor, ImageFormat::Png)
                .map_err(|e| RasterError::Encode {
                    format: format.name(),
                    reason: e.to_string(),
                })?;
        }
        RasterFormat::Lossy { quality } => {
            let rgb = DynamicImage::ImageRgba8(image).into_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)
                .map_err(|e| RasterError::Encode {
                    format: format.name(),
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(4, 3, image::Rgba([10, 200, 30, 128]))
    }

    #[test]
    fn test_names() {
        assert_eq!(RasterFormat::Lossless.name(), "PNG");
        assert_eq!(RasterFormat::DEFAULT_LOSSY.name(), "JPG");
        assert_eq!(RasterFormat::DEFAULT_LOSSY.quality(), Some(90));
        assert_eq!(RasterFormat::Lossless.quality(), None);
    }

    #[test]
    fn test_png_keeps_alpha() {
        let bytes = encode(sample(), RasterFormat::Lossless).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
        assert_eq!(*decoded.to_rgba8().get_pixel(1, 1), image::Rgba([10, 200, 30, 128]));
    }

    #[test]
    fn test_jpeg_has_no_alpha() {
        let bytes = encode(sample(), RasterFormat::Lossy { quality: 80 }).unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn test_jpeg_quality_affects_size() {
        let noisy = RgbaImage::from_fn(64, 64, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 31 + y * 17) % 256) as u8;
            image::Rgba([v, v.wrapping_mul(3), v.wrapping_add(90), 255])
        });
        let low = encode(noisy.clone(), RasterFormat::Lossy { quality: 5 }).unwrap();
        let high = encode(noisy, RasterFormat::Lossy { quality: 100 }).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_jpeg_quality_zero_is_clamped() {
        let bytes = encode(sample(), RasterFormat::Lossy { quality: 0 }).unwrap();
        assert!(!bytes.is_empty());
    }
}
