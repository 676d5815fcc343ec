//! Internal constants for rasterization.

/// Width used when the markup declares no usable size (CSS replaced-element default).
pub const DEFAULT_WIDTH: f64 = 300.0;

/// Height used when the markup declares no usable size.
pub const DEFAULT_HEIGHT: f64 = 150.0;

/// JPEG quality applied when the caller does not specify one.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Largest canvas accepted, in total pixels (0x3FFF squared).
pub const MAX_PIXELS: u64 = 0x3FFF * 0x3FFF;
