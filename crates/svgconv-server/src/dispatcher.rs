//! Tool call dispatch.
//!
//! A call moves through validation, path authorization and conversion, and
//! always ends in a [`ToolResult`]. Failures at any stage become an
//! error-flagged result; nothing here panics or returns an `Err` to the
//! transport.

use std::path::PathBuf;

use serde_json::Value;
use svgconv_raster::{ConversionResult, RasterService};
use svgconv_sandbox::{PathAuthorizer, ensure_directory};

use crate::error::ToolError;
use crate::protocol::ToolResult;
use crate::tools::{ConversionRequest, ToolKind};

/// Runs tool calls against the sandbox and the conversion service.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    authorizer: PathAuthorizer,
    service: RasterService,
}

/// What a successful conversion reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConversionReport {
    kind: ToolKind,
    path: PathBuf,
    result: ConversionResult,
    quality: Option<u8>,
}

impl ConversionReport {
    fn message(&self) -> String {
        let mut text = format!(
            "Successfully converted SVG to {} at {}\nDimensions: {}x{} pixels\nFile size: {} bytes",
            self.kind.label(),
            self.path.display(),
            self.result.width,
            self.result.height,
            self.result.size
        );
        if let Some(quality) = self.quality {
            text.push_str(&format!("\nQuality: {quality}%"));
        }
        text
    }
}

impl Dispatcher {
    /// Create a dispatcher.
    #[must_use]
    pub fn new(authorizer: PathAuthorizer, service: RasterService) -> Self {
        Self {
            authorizer,
            service,
        }
    }

    /// The path authorizer.
    #[must_use]
    pub fn authorizer(&self) -> &PathAuthorizer {
        &self.authorizer
    }

    /// Run one tool call to completion.
    ///
    /// Blocking: rasterization and file I/O happen on the calling thread.
    pub fn call(&self, kind: ToolKind, arguments: Value) -> ToolResult {
        match self.run(kind, arguments) {
            Ok(report) => ToolResult::text(report.message()),
            Err(e) => {
                tracing::debug!(tool = kind.name(), error = %e, "Tool call failed");
                ToolResult::error(format!("Error converting SVG to {}: {e}", kind.label()))
            }
        }
    }

    fn run(&self, kind: ToolKind, arguments: Value) -> Result<ConversionReport, ToolError> {
        let request = kind.validate(arguments)?;
        self.convert(kind, request)
    }

    fn convert(
        &self,
        kind: ToolKind,
        request: ConversionRequest,
    ) -> Result<ConversionReport, ToolError> {
        let resolution = self.authorizer.resolve_safe(&request.output_path);
        if let Some(redirect) = &resolution.redirect {
            tracing::warn!(reason = ?redirect.reason, "{redirect}");
        }

        ensure_directory(&resolution.path)?;
        let result = self.service.convert(
            &request.markup,
            &resolution.path,
            request.format,
            &request.options,
        )?;

        Ok(ConversionReport {
            kind,
            path: resolution.path,
            result,
            quality: request.format.quality(),
        })
    }
}
