//! Output path authorization and redirection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SandboxError;
use crate::normalize::{absolutize, is_strictly_within};
use crate::roots::AllowedRoots;

/// Default base directory for the rebasing heuristic.
const DEFAULT_REBASE_BASE: &str = "/Users";

/// Why a requested path was moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The path was under the rebase base directory; its file name was moved
    /// to the first allowed root.
    Rebased,
    /// The path was elsewhere; its file name was moved to the first allowed root.
    Fallback,
}

/// A requested output path that was replaced by an allowed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Path the caller asked for.
    pub from: PathBuf,
    /// Path that will actually be written.
    pub to: PathBuf,
    /// Which branch of the redirect policy applied.
    pub reason: RedirectReason,
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Redirecting: {} -> {}",
            self.from.display(),
            self.to.display()
        )
    }
}

/// Outcome of [`PathAuthorizer::resolve_safe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Path to write to. Always inside an allowed root.
    pub path: PathBuf,
    /// Set when `path` differs from the requested path.
    pub redirect: Option<Redirect>,
}

impl Resolution {
    /// Whether the requested path was replaced.
    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.redirect.is_some()
    }
}

/// Decides where output may be written.
///
/// Holds the allowed roots, the base directory for the rebasing heuristic,
/// and the working directory that relative request paths resolve against.
/// All checks are lexical; the filesystem is not consulted.
#[derive(Debug, Clone)]
pub struct PathAuthorizer {
    roots: Arc<AllowedRoots>,
    rebase_base: PathBuf,
    working_dir: PathBuf,
}

impl PathAuthorizer {
    /// Create an authorizer for the given roots.
    ///
    /// Relative request paths resolve against the current working directory
    /// at the time of this call. The rebase base defaults to `/Users`.
    #[must_use]
    pub fn new(roots: Arc<AllowedRoots>) -> Self {
        Self {
            roots,
            rebase_base: PathBuf::from(DEFAULT_REBASE_BASE),
            working_dir: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Set the base directory for the rebasing heuristic.
    #[must_use]
    pub fn rebase_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.rebase_base = base.into();
        self
    }

    /// Set the directory relative request paths resolve against.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// The allowed roots.
    #[must_use]
    pub fn roots(&self) -> &AllowedRoots {
        &self.roots
    }

    /// Whether `path` is an allowed root or lies beneath one.
    ///
    /// The path is made absolute and normalized first, so `..` segments
    /// cannot climb out of a root.
    #[must_use]
    pub fn is_allowed(&self, path: &Path) -> bool {
        self.roots.contains(&absolutize(path, &self.working_dir))
    }

    /// Resolve the path output will actually be written to.
    ///
    /// Allowed paths are returned unchanged. Any other path is replaced by
    /// its file name joined onto the first allowed root; the caller's
    /// directory structure is discarded. A path with no file name (`/`,
    /// `a/..`) maps to the first root itself.
    ///
    /// Never fails, and the result always satisfies [`is_allowed`](Self::is_allowed).
    #[must_use]
    pub fn resolve_safe(&self, path: &Path) -> Resolution {
        if self.is_allowed(path) {
            return Resolution {
                path: path.to_path_buf(),
                redirect: None,
            };
        }

        let absolute = absolutize(path, &self.working_dir);
        let reason = if is_strictly_within(&absolute, &self.rebase_base) {
            RedirectReason::Rebased
        } else {
            RedirectReason::Fallback
        };

        let target = match path.file_name() {
            Some(name) => self.roots.first().join(name),
            None => self.roots.first().to_path_buf(),
        };

        Resolution {
            path: target.clone(),
            redirect: Some(Redirect {
                from: path.to_path_buf(),
                to: target,
                reason,
            }),
        }
    }
}

/// Create all missing parent directories of `path`.
///
/// Succeeds if they already exist.
///
/// # Errors
///
/// Returns [`SandboxError::Io`] if a directory cannot be created.
pub fn ensure_directory(path: &Path) -> Result<(), SandboxError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tracing::debug!(dir = %parent.display(), "Ensuring output directory");
    std::fs::create_dir_all(parent).map_err(|source| SandboxError::Io {
        path: parent.to_path_buf(),
        source,
    })
}
