//! SVG to raster conversion for svgconv.
//!
//! This crate turns SVG markup into PNG or JPG files:
//!
//! - [`resolve_dimensions`] derives the intrinsic size from the root `<svg>` element
//! - [`scaled_size`] and [`contain`] compute the output canvas and content placement
//! - [`Rasterizer`] renders markup onto a canvas (`resvg` in production)
//! - [`encode`] produces PNG or JPEG bytes
//! - [`RasterService`] ties the steps together and writes the output file
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use svgconv_raster::{ConversionOptions, RasterFormat, RasterService};
//!
//! let service = RasterService::default();
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"/>"#;
//! let result = service
//!     .convert(svg, Path::new("/tmp/out.png"), RasterFormat::Lossless, &ConversionOptions::default())
//!     .unwrap();
//! assert_eq!((result.width, result.height), (10, 10));
//! ```

mod color;
mod consts;
mod dimensions;
mod encode;
mod error;
mod geometry;
mod render;
mod service;

pub use color::Background;
pub use consts::DEFAULT_JPEG_QUALITY;
pub use dimensions::{Dimensions, resolve_dimensions};
pub use encode::{RasterFormat, encode};
pub use error::RasterError;
pub use geometry::{PixelSize, Placement, contain, effective_scale, scaled_size};
pub use render::{Backdrop, Canvas, Rasterizer, ResvgRasterizer};
pub use service::{ConversionOptions, ConversionResult, RasterService};
