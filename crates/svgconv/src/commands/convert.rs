//! `svgconv convert` command implementation.
//!
//! Runs a single conversion through the same dispatcher the server uses, so
//! validation and output sandboxing behave identically.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::{Map, Value, json};
use svgconv_config::{CliSettings, Config};
use svgconv_server::{Server, ToolKind, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    #[default]
    Png,
    Jpg,
}

impl From<Format> for ToolKind {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => Self::Png,
            Format::Jpg => Self::Jpg,
        }
    }
}

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// SVG file to convert.
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the image.
    #[arg(short, long)]
    output: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,

    /// JPEG quality, 1-100 (default: 90).
    #[arg(short, long)]
    quality: Option<u32>,

    /// Scale factor (default: 1).
    #[arg(short, long)]
    scale: Option<f64>,

    /// Background color, any CSS color.
    #[arg(short, long)]
    background: Option<String>,

    /// Allowed output directory; repeatable (default: config, then current directory).
    #[arg(long = "allow", value_name = "DIR")]
    allowed_dirs: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover svgconv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not load system fonts; `<text>` renders as nothing.
    #[arg(long)]
    no_system_fonts: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input cannot be read, or
    /// the conversion reports a failure.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let markup = std::fs::read_to_string(&self.input).map_err(|source| CliError::Input {
            path: self.input.clone(),
            source,
        })?;
        let arguments = self.tool_arguments(markup);

        let cli_settings = CliSettings {
            allowed_dirs: self.allowed_dirs,
            system_fonts: self.no_system_fonts.then_some(false),
            ..CliSettings::default()
        };
        let mut config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if config.sandbox_resolved.allowed_dirs.is_empty() {
            config.sandbox_resolved.allowed_dirs = vec![std::env::current_dir()?];
        }

        let server = Server::new(server_config_from_config(&config, version.to_owned()))?;
        let result = server.dispatcher().call(self.format.into(), arguments);

        let text = result.joined_text();
        if result.is_error {
            return Err(CliError::Conversion(text));
        }
        output.success(&text);
        Ok(())
    }

    /// Tool arguments equivalent to these flags.
    fn tool_arguments(&self, markup: String) -> Value {
        let mut arguments = Map::new();
        arguments.insert("svgCode".to_owned(), Value::String(markup));
        arguments.insert("outputPath".to_owned(), path_value(&self.output));
        if let Some(background) = &self.background {
            arguments.insert("backgroundColor".to_owned(), json!(background));
        }
        if let Some(scale) = self.scale {
            arguments.insert("scale".to_owned(), json!(scale));
        }
        if let Some(quality) = self.quality {
            arguments.insert("quality".to_owned(), json!(quality));
        }
        Value::Object(arguments)
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}
