//! CLI error types.

use svgconv_config::ConfigError;
use svgconv_sandbox::RootsError;
use svgconv_server::ServerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("Cannot read {}: {source}", path.display())]
    Input {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Conversion(String),
}

impl CliError {
    /// Extra line to print after the error, if any.
    pub(crate) fn usage_hint(&self) -> Option<&'static str> {
        match self {
            Self::Server(ServerError::Roots(RootsError::Empty)) => {
                Some("Usage: svgconv serve <allowed_dir1> [allowed_dir2] ...")
            }
            _ => None,
        }
    }
}
