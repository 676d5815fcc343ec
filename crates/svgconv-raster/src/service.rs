//! End-to-end conversion: size, render, encode, write.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::color::Background;
use crate::dimensions::resolve_dimensions;
use crate::encode::{RasterFormat, encode};
use crate::error::RasterError;
use crate::geometry::{effective_scale, scaled_size};
use crate::render::{Backdrop, Canvas, Rasterizer, ResvgRasterizer};

/// Per-request rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConversionOptions {
    /// Background color. PNG output stays transparent when `None`; JPG uses white.
    pub background: Option<Background>,
    /// Output scale factor. Missing or non-positive means 1.
    pub scale: Option<f64>,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionResult {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Size of the written file in bytes.
    pub size: u64,
}

/// Converts SVG markup to raster files.
///
/// The service is stateless between calls and can be shared across threads.
#[derive(Clone)]
pub struct RasterService {
    rasterizer: Arc<dyn Rasterizer>,
}

impl RasterService {
    /// Create a service around a rasterizer.
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self { rasterizer }
    }

    /// Convert `markup` and write the result to `output`.
    ///
    /// The parent directory of `output` must already exist. Nothing is
    /// written unless rendering and encoding both succeed.
    pub fn convert(
        &self,
        markup: &str,
        output: &Path,
        format: RasterFormat,
        options: &ConversionOptions,
    ) -> Result<ConversionResult, RasterError> {
        let dimensions = resolve_dimensions(markup)?;
        let size = scaled_size(dimensions, effective_scale(options.scale))?;

        let canvas = Canvas {
            size,
            backdrop: backdrop_for(format, options.background),
        };
        let image = self.rasterizer.rasterize(markup, &canvas)?;
        if image.dimensions() != (size.width, size.height) {
            return Err(RasterError::Render(format!(
                "rasterizer produced {}x{}, expected {}x{}",
                image.width(),
                image.height(),
                size.width,
                size.height
            )));
        }

        let bytes = encode(image, format)?;
        fs::write(output, &bytes).map_err(|source| RasterError::Io {
            path: output.to_path_buf(),
            source,
        })?;
        let written = fs::metadata(output)
            .map_err(|source| RasterError::Io {
                path: output.to_path_buf(),
                source,
            })?
            .len();

        tracing::info!(
            path = %output.display(),
            format = format.name(),
            width = size.width,
            height = size.height,
            bytes = written,
            "Wrote raster image"
        );

        Ok(ConversionResult {
            width: size.width,
            height: size.height,
            size: written,
        })
    }
}

impl Default for RasterService {
    fn default() -> Self {
        Self::new(Arc::new(ResvgRasterizer::new()))
    }
}

impl std::fmt::Debug for RasterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterService").finish_non_exhaustive()
    }
}

/// PNG flattens only the content area when a color is given. JPG always fills
/// the whole canvas with an opaque color.
fn backdrop_for(format: RasterFormat, background: Option<Background>) -> Backdrop {
    if format.has_alpha() {
        background.map_or(Backdrop::Transparent, Backdrop::Content)
    } else {
        Backdrop::Full(background.unwrap_or(Background::WHITE).opaque())
    }
}
