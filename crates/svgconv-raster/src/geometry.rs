//! Canvas sizing and contain-fit placement.

use crate::consts::MAX_PIXELS;
use crate::dimensions::Dimensions;
use crate::error::RasterError;

/// Output canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Where rendered content lands on the canvas.
///
/// Content of the source's intrinsic size is scaled uniformly by `scale` and
/// its top-left corner placed at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left offset in pixels.
    pub x: f32,
    /// Top offset in pixels.
    pub y: f32,
    /// Uniform scale factor.
    pub scale: f32,
    /// Scaled content width in pixels.
    pub width: f32,
    /// Scaled content height in pixels.
    pub height: f32,
}

/// Scale factor to use for a requested one. Missing, non-positive and
/// non-finite values mean 1.
#[must_use]
pub fn effective_scale(scale: Option<f64>) -> f64 {
    match scale {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => 1.0,
    }
}

/// Canvas size for `dimensions` at `scale`, rounding half away from zero.
///
/// # Errors
///
/// Returns [`RasterError::InvalidCanvas`] if either side rounds to zero or the
/// canvas exceeds the pixel limit.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scaled_size(dimensions: Dimensions, scale: f64) -> Result<PixelSize, RasterError> {
    let width = (dimensions.width * scale).round();
    let height = (dimensions.height * scale).round();

    #[allow(clippy::cast_precision_loss)]
    let too_large = width * height > MAX_PIXELS as f64;
    if width < 1.0 || height < 1.0 || too_large {
        return Err(RasterError::InvalidCanvas { width, height });
    }

    Ok(PixelSize {
        width: width as u32,
        height: height as u32,
    })
}

/// Fit content of `source_width` x `source_height` inside `canvas`, keeping
/// its aspect ratio and centering it. Never crops or stretches.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn contain(source_width: f32, source_height: f32, canvas: PixelSize) -> Placement {
    let canvas_width = canvas.width as f32;
    let canvas_height = canvas.height as f32;

    if source_width <= 0.0 || source_height <= 0.0 {
        return Placement {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            width: canvas_width,
            height: canvas_height,
        };
    }

    let scale = (canvas_width / source_width).min(canvas_height / source_height);
    let width = source_width * scale;
    let height = source_height * scale;

    Placement {
        x: (canvas_width - width) / 2.0,
        y: (canvas_height - height) / 2.0,
        scale,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn size(width: u32, height: u32) -> PixelSize {
        PixelSize { width, height }
    }

    #[test]
    fn test_effective_scale() {
        assert_eq!(effective_scale(None), 1.0);
        assert_eq!(effective_scale(Some(2.5)), 2.5);
        assert_eq!(effective_scale(Some(0.0)), 1.0);
        assert_eq!(effective_scale(Some(-3.0)), 1.0);
        assert_eq!(effective_scale(Some(f64::NAN)), 1.0);
        assert_eq!(effective_scale(Some(f64::INFINITY)), 1.0);
    }

    #[test]
    fn test_scaled_size_doubles_default() {
        let result = scaled_size(Dimensions::DEFAULT, 2.0).unwrap();
        assert_eq!(result, size(600, 300));
    }

    #[test]
    fn test_scaled_size_rounds_half_away_from_zero() {
        let dims = Dimensions {
            width: 2.5,
            height: 3.49,
        };
        assert_eq!(scaled_size(dims, 1.0).unwrap(), size(3, 3));

        let dims = Dimensions {
            width: 100.25,
            height: 10.0,
        };
        assert_eq!(scaled_size(dims, 2.0).unwrap(), size(201, 20));
    }

    #[test]
    fn test_scaled_size_rejects_empty_canvas() {
        let dims = Dimensions {
            width: 0.2,
            height: 10.0,
        };
        assert!(matches!(
            scaled_size(dims, 1.0),
            Err(RasterError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_scaled_size_rejects_huge_canvas() {
        let dims = Dimensions {
            width: 100_000.0,
            height: 100_000.0,
        };
        assert!(matches!(
            scaled_size(dims, 1.0),
            Err(RasterError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_contain_same_aspect_fills_canvas() {
        let placement = contain(100.0, 50.0, size(300, 150));
        assert_eq!(
            placement,
            Placement {
                x: 0.0,
                y: 0.0,
                scale: 3.0,
                width: 300.0,
                height: 150.0
            }
        );
    }

    #[test]
    fn test_contain_wide_source_letterboxes_vertically() {
        let placement = contain(200.0, 100.0, size(100, 100));
        assert_eq!(
            placement,
            Placement {
                x: 0.0,
                y: 25.0,
                scale: 0.5,
                width: 100.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn test_contain_tall_source_letterboxes_horizontally() {
        let placement = contain(50.0, 100.0, size(200, 100));
        assert_eq!(placement.x, 75.0);
        assert_eq!(placement.y, 0.0);
        assert_eq!(placement.width, 50.0);
        assert_eq!(placement.height, 100.0);
    }
}
