//! Tool catalog and argument validation.
//!
//! Two tools are exposed: `svg-to-png` and `svg-to-jpg`. Arguments arrive as
//! camelCase JSON and are checked here before anything touches the filesystem.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use svgconv_raster::{Background, ConversionOptions, DEFAULT_JPEG_QUALITY, RasterFormat};

use crate::error::ToolError;

/// A tool the server can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// `svg-to-png`: lossless output with optional transparency.
    Png,
    /// `svg-to-jpg`: lossy output on an opaque background.
    Jpg,
}

impl ToolKind {
    /// Every tool, in listing order.
    pub const ALL: [Self; 2] = [Self::Png, Self::Jpg];

    /// Wire name of the tool.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "svg-to-png",
            Self::Jpg => "svg-to-jpg",
        }
    }

    /// Look up a tool by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Uppercase format label used in response text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpg => "JPG",
        }
    }

    /// Listing entry with description and input schema.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        match self {
            Self::Png => ToolDefinition {
                name: self.name(),
                description: "Convert SVG to PNG with high quality and resolution preservation",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "svgCode": {
                            "type": "string",
                            "description": "The SVG code to convert"
                        },
                        "outputPath": {
                            "type": "string",
                            "description": "The path where the PNG file should be saved"
                        },
                        "backgroundColor": {
                            "type": "string",
                            "description": "Optional background color (default: transparent)"
                        },
                        "scale": {
                            "type": "number",
                            "description": "Optional scale factor for higher resolution (default: 1)"
                        }
                    },
                    "required": ["svgCode", "outputPath"]
                }),
            },
            Self::Jpg => ToolDefinition {
                name: self.name(),
                description: "Convert SVG to JPG with high quality and resolution preservation",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "svgCode": {
                            "type": "string",
                            "description": "The SVG code to convert"
                        },
                        "outputPath": {
                            "type": "string",
                            "description": "The path where the JPG file should be saved"
                        },
                        "backgroundColor": {
                            "type": "string",
                            "description": "Optional background color (default: white)"
                        },
                        "quality": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": 100,
                            "description": "Optional JPEG quality from 1-100 (default: 90)"
                        },
                        "scale": {
                            "type": "number",
                            "description": "Optional scale factor for higher resolution (default: 1)"
                        }
                    },
                    "required": ["svgCode", "outputPath"]
                }),
            },
        }
    }

    /// Check raw call arguments and build a conversion request.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Validation`] for missing or mistyped fields, an
    /// empty output path, an unparseable background color, or (JPG only) a
    /// quality that is not an integer in 1-100.
    pub fn validate(self, arguments: Value) -> Result<ConversionRequest, ToolError> {
        let args: ToolArguments = serde_json::from_value(arguments)
            .map_err(|e| ToolError::Validation(e.to_string()))?;

        if args.output_path.trim().is_empty() {
            return Err(ToolError::Validation(
                "outputPath must not be empty".to_owned(),
            ));
        }

        let background = args
            .background_color
            .as_deref()
            .map(Background::parse)
            .transpose()
            .map_err(|e| ToolError::Validation(e.to_string()))?;

        let format = match self {
            Self::Png => RasterFormat::Lossless,
            Self::Jpg => RasterFormat::Lossy {
                quality: args.quality.map_or(Ok(DEFAULT_JPEG_QUALITY), parse_quality)?,
            },
        };

        Ok(ConversionRequest {
            markup: args.svg_code,
            output_path: PathBuf::from(args.output_path),
            format,
            options: ConversionOptions {
                background,
                scale: args.scale,
            },
        })
    }
}

/// `quality` must be a whole number from 1 to 100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_quality(value: f64) -> Result<u8, ToolError> {
    if value.fract() != 0.0 || !(1.0..=100.0).contains(&value) {
        return Err(ToolError::Validation(format!(
            "quality must be an integer from 1 to 100, got {value}"
        )));
    }
    Ok(value as u8)
}

/// Listing entry returned by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Wire name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema for the arguments object.
    pub input_schema: Value,
}

/// Raw tool arguments as sent by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolArguments {
    #[serde(alias = "markup")]
    svg_code: String,
    output_path: String,
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    scale: Option<f64>,
    #[serde(default)]
    quality: Option<f64>,
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// SVG markup.
    pub markup: String,
    /// Output path as requested, before authorization.
    pub output_path: PathBuf,
    /// Output format.
    pub format: RasterFormat,
    /// Background and scale.
    pub options: ConversionOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn validation_message(result: Result<ConversionRequest, ToolError>) -> String {
        match result {
            Err(ToolError::Validation(message)) => message,
            other => panic!("Expected ToolError::Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("svg-to-gif"), None);
    }

    #[test]
    fn test_definitions_require_markup_and_path() {
        for kind in ToolKind::ALL {
            let def = kind.definition();
            assert_eq!(def.input_schema["required"], json!(["svgCode", "outputPath"]));
        }
        let jpg = serde_json::to_value(ToolKind::Jpg.definition()).unwrap();
        assert_eq!(jpg["inputSchema"]["properties"]["quality"]["maximum"], json!(100));
        let png = serde_json::to_value(ToolKind::Png.definition()).unwrap();
        assert!(png["inputSchema"]["properties"].get("quality").is_none());
    }

    #[test]
    fn test_validate_png_minimal() {
        let request = ToolKind::Png
            .validate(json!({"svgCode": "<svg/>", "outputPath": "/tmp/a.png"}))
            .unwrap();

        assert_eq!(
            request,
            ConversionRequest {
                markup: "<svg/>".to_owned(),
                output_path: PathBuf::from("/tmp/a.png"),
                format: RasterFormat::Lossless,
                options: ConversionOptions::default(),
            }
        );
    }

    #[test]
    fn test_validate_accepts_markup_alias() {
        let request = ToolKind::Png
            .validate(json!({"markup": "<svg/>", "outputPath": "a.png"}))
            .unwrap();
        assert_eq!(request.markup, "<svg/>");
    }

    #[test]
    fn test_validate_jpg_defaults_quality() {
        let request = ToolKind::Jpg
            .validate(json!({"svgCode": "<svg/>", "outputPath": "a.jpg"}))
            .unwrap();
        assert_eq!(request.format, RasterFormat::Lossy { quality: 90 });
    }

    #[test]
    fn test_validate_jpg_full_arguments() {
        let request = ToolKind::Jpg
            .validate(json!({
                "svgCode": "<svg/>",
                "outputPath": "a.jpg",
                "backgroundColor": "#000",
                "quality": 55,
                "scale": 2.5
            }))
            .unwrap();

        assert_eq!(request.format, RasterFormat::Lossy { quality: 55 });
        assert_eq!(request.options.scale, Some(2.5));
        assert_eq!(
            request.options.background,
            Some(Background {
                r: 0,
                g: 0,
                b: 0,
                a: 255
            })
        );
    }

    #[test]
    fn test_validate_quality_bounds() {
        for quality in [json!(0), json!(101), json!(-5), json!(50.5)] {
            let message = validation_message(ToolKind::Jpg.validate(json!({
                "svgCode": "<svg/>",
                "outputPath": "a.jpg",
                "quality": quality
            })));
            assert!(message.starts_with("quality must be an integer"), "{message}");
        }

        for quality in [1, 100] {
            let request = ToolKind::Jpg
                .validate(json!({"svgCode": "<svg/>", "outputPath": "a.jpg", "quality": quality}))
                .unwrap();
            assert_eq!(request.format.quality(), Some(u8::try_from(quality).unwrap()));
        }
    }

    #[test]
    fn test_validate_png_ignores_quality() {
        let request = ToolKind::Png
            .validate(json!({"svgCode": "<svg/>", "outputPath": "a.png", "quality": 500}))
            .unwrap();
        assert_eq!(request.format, RasterFormat::Lossless);
    }

    #[test]
    fn test_validate_missing_fields() {
        let message = validation_message(ToolKind::Png.validate(json!({"outputPath": "a.png"})));
        assert!(message.contains("svgCode"), "{message}");

        let message = validation_message(ToolKind::Png.validate(json!({"svgCode": "<svg/>"})));
        assert!(message.contains("outputPath"), "{message}");
    }

    #[test]
    fn test_validate_wrong_types() {
        let result = ToolKind::Png.validate(json!({"svgCode": 42, "outputPath": "a.png"}));
        validation_message(result);

        let result = ToolKind::Png.validate(json!({
            "svgCode": "<svg/>",
            "outputPath": "a.png",
            "scale": "big"
        }));
        validation_message(result);
    }

    #[test]
    fn test_validate_empty_output_path() {
        let message = validation_message(
            ToolKind::Png.validate(json!({"svgCode": "<svg/>", "outputPath": "  "})),
        );
        assert_eq!(message, "outputPath must not be empty");
    }

    #[test]
    fn test_validate_bad_color() {
        let message = validation_message(ToolKind::Png.validate(json!({
            "svgCode": "<svg/>",
            "outputPath": "a.png",
            "backgroundColor": "notacolor"
        })));
        assert!(message.contains("notacolor"), "{message}");
    }
}
