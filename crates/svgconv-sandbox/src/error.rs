//! Sandbox error types.

use std::path::PathBuf;

/// Invalid allowed-directory configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RootsError {
    /// No directories were supplied.
    #[error("You must specify at least one allowed directory")]
    Empty,

    /// A supplied path exists but is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A supplied path could not be accessed (missing, permission denied).
    #[error("Error accessing directory {}: {source}", path.display())]
    Inaccessible {
        /// The configured path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The working directory needed to resolve a relative root is unavailable.
    #[error("Cannot resolve relative directory {}: {source}", path.display())]
    WorkingDir {
        /// The relative path that needed resolving.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Filesystem error raised while preparing an output location.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Directory creation failed.
    #[error("Failed to create directory {}: {source}", path.display())]
    Io {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
