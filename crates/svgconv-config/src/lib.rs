//! Configuration management for svgconv.
//!
//! Parses `svgconv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable and `~` expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `sandbox.allowed_dirs`
//! - `sandbox.rebase_base`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-empty / non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Allowed output directories. Replaces `sandbox.allowed_dirs` when non-empty.
    pub allowed_dirs: Vec<PathBuf>,
    /// Override the base directory used for path rebasing.
    pub rebase_base: Option<PathBuf>,
    /// Override system font loading.
    pub system_fonts: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "svgconv.toml";

/// Base directory that disallowed output paths are rebased from.
pub const DEFAULT_REBASE_BASE: &str = "/Users";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sandbox configuration (paths are strings from TOML).
    sandbox: SandboxConfigRaw,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Resolved sandbox configuration (set after loading).
    #[serde(skip)]
    pub sandbox_resolved: SandboxConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw sandbox configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SandboxConfigRaw {
    allowed_dirs: Option<Vec<String>>,
    rebase_base: Option<String>,
}

/// Resolved sandbox configuration with absolute paths where possible.
#[derive(Debug)]
pub struct SandboxConfig {
    /// Directories output may be written to, in priority order.
    ///
    /// Relative entries from the config file are resolved against the config
    /// file's directory. Existence is checked at startup, not here.
    pub allowed_dirs: Vec<PathBuf>,
    /// Well-known base directory used by the rebasing heuristic.
    pub rebase_base: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            allowed_dirs: Vec::new(),
            rebase_base: PathBuf::from(DEFAULT_REBASE_BASE),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Load system fonts for `<text>` rendering.
    pub system_fonts: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { system_fonts: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sandbox.rebase_base`").
        field: String,
        /// Error message (e.g., "${`HOME`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `svgconv.toml` in current directory and parents.
    /// A missing config file is not an error when auto-discovering.
    ///
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if !settings.allowed_dirs.is_empty() {
            self.sandbox_resolved
                .allowed_dirs
                .clone_from(&settings.allowed_dirs);
        }
        if let Some(base) = &settings.rebase_base {
            self.sandbox_resolved.rebase_base.clone_from(base);
        }
        if let Some(system_fonts) = settings.system_fonts {
            self.render.system_fonts = system_fonts;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sandbox_resolved.rebase_base.is_absolute() {
            return Err(ConfigError::Validation(format!(
                "sandbox.rebase_base must be an absolute path, got {}",
                self.sandbox_resolved.rebase_base.display()
            )));
        }
        if self
            .sandbox_resolved
            .allowed_dirs
            .iter()
            .any(|dir| dir.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "sandbox.allowed_dirs cannot contain empty paths".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in path strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(dirs) = self.sandbox.allowed_dirs.as_mut() {
            for dir in dirs.iter_mut() {
                *dir = expand::expand_path(dir, "sandbox.allowed_dirs")?;
            }
        }
        if let Some(ref base) = self.sandbox.rebase_base {
            self.sandbox.rebase_base = Some(expand::expand_path(base, "sandbox.rebase_base")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let allowed_dirs = self
            .sandbox
            .allowed_dirs
            .iter()
            .flatten()
            .map(|dir| {
                if dir.is_empty() {
                    PathBuf::new()
                } else {
                    config_dir.join(dir)
                }
            })
            .collect();

        self.sandbox_resolved = SandboxConfig {
            allowed_dirs,
            rebase_base: self
                .sandbox
                .rebase_base
                .as_deref()
                .map_or_else(|| PathBuf::from(DEFAULT_REBASE_BASE), PathBuf::from),
        };
    }
}
