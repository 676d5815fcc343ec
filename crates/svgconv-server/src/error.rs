//! Server error types.

use svgconv_raster::RasterError;
use svgconv_sandbox::{RootsError, SandboxError};

/// Error raised while handling a single tool call.
///
/// Never escapes the dispatcher: every variant is reported to the caller as
/// an error-flagged tool result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments are missing, mistyped or out of range.
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// The output directory could not be prepared.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// Conversion failed.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Error that stops the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The allowed directories are unusable.
    #[error(transparent)]
    Roots(#[from] RootsError),

    /// Reading requests or writing responses failed.
    #[error("stdio transport failed: {0}")]
    Io(#[from] std::io::Error),
}
