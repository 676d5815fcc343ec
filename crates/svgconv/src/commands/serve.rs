//! `svgconv serve` command implementation.

use std::fmt;
use std::path::PathBuf;

use clap::Args;
use svgconv_config::{CliSettings, Config};
use svgconv_server::{Server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Directories output may be written to (overrides config).
    #[arg(value_name = "DIR")]
    allowed_dirs: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover svgconv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base directory for rebasing disallowed paths (overrides config).
    #[arg(long, value_name = "DIR")]
    rebase_base: Option<PathBuf>,

    /// Do not load system fonts; `<text>` renders as nothing.
    #[arg(long)]
    no_system_fonts: bool,

    /// Enable verbose output (info-level logs on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, an allowed directory is
    /// unusable, or stdio fails.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            allowed_dirs: self.allowed_dirs,
            rebase_base: self.rebase_base,
            system_fonts: self.no_system_fonts.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let server = Server::new(server_config_from_config(&config, version.to_owned()))?;

        for line in startup_lines(&config, server.dispatcher().authorizer().roots()) {
            output.info(&line);
        }

        server.run_stdio().await?;
        Ok(())
    }
}

/// Banner printed to stderr before the server starts reading stdin.
fn startup_lines(config: &Config, roots: &impl fmt::Display) -> Vec<String> {
    let mut lines = vec!["SVG Converter MCP Server starting...".to_owned()];
    if let Some(path) = &config.config_path {
        lines.push(format!("Config file: {}", path.display()));
    }
    lines.push(format!("Allowed directories: {roots}"));
    lines
}
