//! Rasterization of SVG markup onto a sized canvas.
//!
//! [`Rasterizer`] is the seam to the rendering engine. [`ResvgRasterizer`] is
//! the production implementation, backed by `resvg`.

use std::sync::Arc;

use image::RgbaImage;
use resvg::tiny_skia::{Color, Paint, Pixmap, Rect, Transform};
use resvg::usvg;

use crate::color::Background;
use crate::error::RasterError;
use crate::geometry::{PixelSize, Placement, contain};

/// What sits behind the rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    /// Nothing; uncovered pixels stay fully transparent.
    Transparent,
    /// The content area is flattened onto the color; letterbox stays transparent.
    Content(Background),
    /// The whole canvas, letterbox included, is filled with the color.
    Full(Background),
}

/// Target canvas for one rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    /// Output size in pixels.
    pub size: PixelSize,
    /// Background policy.
    pub backdrop: Backdrop,
}

/// Renders SVG markup into an RGBA image of exactly the canvas size.
///
/// Implementations fit the document into the canvas with a contain policy:
/// aspect ratio preserved, centered, never cropped.
pub trait Rasterizer: Send + Sync {
    /// Render `markup` onto `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Render`] if the engine rejects the markup.
    fn rasterize(&self, markup: &str, canvas: &Canvas) -> Result<RgbaImage, RasterError>;
}

/// [`Rasterizer`] backed by `resvg`.
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
}

impl ResvgRasterizer {
    /// Create a rasterizer with system fonts loaded for `<text>` rendering.
    #[must_use]
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(faces = fontdb.len(), "Loaded system fonts");
        Self::with_fontdb(fontdb)
    }

    /// Create a rasterizer without any fonts. Text elements render as nothing.
    #[must_use]
    pub fn without_system_fonts() -> Self {
        Self::with_fontdb(usvg::fontdb::Database::new())
    }

    fn with_fontdb(fontdb: usvg::fontdb::Database) -> Self {
        Self {
            options: usvg::Options {
                fontdb: Arc::new(fontdb),
                ..usvg::Options::default()
            },
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgRasterizer")
            .field("font_faces", &self.options.fontdb.len())
            .finish_non_exhaustive()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, markup: &str, canvas: &Canvas) -> Result<RgbaImage, RasterError> {
        let tree = usvg::Tree::from_str(markup, &self.options)
            .map_err(|e| RasterError::Render(format!("failed to parse SVG: {e}")))?;

        let PixelSize { width, height } = canvas.size;
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidCanvas {
            width: f64::from(width),
            height: f64::from(height),
        })?;

        let source = tree.size();
        let placement = contain(source.width(), source.height(), canvas.size);
        paint_backdrop(&mut pixmap, canvas.backdrop, &placement);

        let transform = Transform::from_row(
            placement.scale,
            0.0,
            0.0,
            placement.scale,
            placement.x,
            placement.y,
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        into_rgba_image(&pixmap)
    }
}

fn paint_backdrop(pixmap: &mut Pixmap, backdrop: Backdrop, placement: &Placement) {
    match backdrop {
        Backdrop::Transparent => {}
        Backdrop::Full(color) => {
            pixmap.fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
        }
        Backdrop::Content(color) => {
            let Some(rect) =
                Rect::from_xywh(placement.x, placement.y, placement.width, placement.height)
            else {
                return;
            };
            let mut paint = Paint::default();
            paint.set_color_rgba8(color.r, color.g, color.b, color.a);
            paint.anti_alias = false;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

/// Convert tiny-skia's premultiplied pixels to a straight-alpha image.
fn into_rgba_image(pixmap: &Pixmap) -> Result<RgbaImage, RasterError> {
    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .ok_or_else(|| RasterError::Render("pixel buffer does not match canvas size".to_owned()))
}
