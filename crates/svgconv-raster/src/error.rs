//! Error types for rasterization.

use std::path::PathBuf;

/// Error raised by the conversion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The markup has no root `<svg>` element or cannot be parsed up to it.
    #[error("Invalid SVG: {0}")]
    MalformedInput(String),

    /// A background color string is not a valid CSS color.
    #[error("Invalid color {value:?}: {reason}")]
    InvalidColor {
        /// The rejected color string.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The scaled canvas is empty or too large to allocate.
    #[error("Invalid output size {width}x{height}")]
    InvalidCanvas {
        /// Requested width in pixels.
        width: f64,
        /// Requested height in pixels.
        height: f64,
    },

    /// The rasterizer rejected the markup.
    #[error("Rendering failed: {0}")]
    Render(String),

    /// The encoder rejected the rendered image.
    #[error("{format} encoding failed: {reason}")]
    Encode {
        /// Output format name ("PNG", "JPG").
        format: &'static str,
        /// Encoder message.
        reason: String,
    },

    /// Writing or reading back the output file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Output file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
