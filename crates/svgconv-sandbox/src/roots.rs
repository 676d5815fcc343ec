//! Allowed output directories.

use std::path::{Path, PathBuf};

use crate::error::RootsError;
use crate::normalize::{absolutize, is_within};

/// Ordered, non-empty set of directories output may be written to.
///
/// Built once at startup and never modified. Every root existed and was a
/// directory when the set was constructed. Roots are stored absolute and
/// lexically normalized, in the order they were supplied; the first root is
/// the redirect target for disallowed paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedRoots {
    roots: Vec<PathBuf>,
}

impl AllowedRoots {
    /// Validate and collect the allowed directories.
    ///
    /// Relative paths are resolved against the current working directory.
    ///
    /// # Errors
    ///
    /// - [`RootsError::Empty`] if no directories are supplied
    /// - [`RootsError::Inaccessible`] if a directory cannot be stat'ed
    /// - [`RootsError::NotADirectory`] if a path is not a directory
    pub fn new<I, P>(dirs: I) -> Result<Self, RootsError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut roots = Vec::new();
        for dir in dirs {
            let dir = dir.into();
            let metadata = std::fs::metadata(&dir).map_err(|source| RootsError::Inaccessible {
                path: dir.clone(),
                source,
            })?;
            if !metadata.is_dir() {
                return Err(RootsError::NotADirectory(dir));
            }
            roots.push(Self::absolute(dir)?);
        }

        if roots.is_empty() {
            return Err(RootsError::Empty);
        }
        Ok(Self { roots })
    }

    fn absolute(dir: PathBuf) -> Result<PathBuf, RootsError> {
        if dir.is_absolute() {
            return Ok(absolutize(&dir, Path::new("/")));
        }
        let cwd = std::env::current_dir().map_err(|source| RootsError::WorkingDir {
            path: dir.clone(),
            source,
        })?;
        Ok(absolutize(&dir, &cwd))
    }

    /// First root, the target for redirected output.
    #[must_use]
    pub fn first(&self) -> &Path {
        // Non-empty by construction.
        &self.roots[0]
    }

    /// Iterate over the roots in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    /// Number of roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Always `false`; present for API symmetry with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether an absolute, normalized path is a root or lies beneath one.
    pub(crate) fn contains(&self, normalized: &Path) -> bool {
        self.roots.iter().any(|root| is_within(normalized, root))
    }
}

impl std::fmt::Display for AllowedRoots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, root) in self.roots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", root.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_accepts_existing_directories() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();

        let roots = AllowedRoots::new([a.path(), b.path()]).unwrap();

        assert_eq!(roots.len(), 2);
        assert_eq!(roots.first(), a.path());
        assert_eq!(roots.iter().collect::<Vec<_>>(), vec![a.path(), b.path()]);
    }

    #[test]
    fn test_new_rejects_empty() {
        let result = AllowedRoots::new(Vec::<PathBuf>::new());
        assert!(matches!(result, Err(RootsError::Empty)));
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = AllowedRoots::new([&missing]).unwrap_err();

        assert!(
            matches!(err, RootsError::Inaccessible { ref path, .. } if *path == missing),
            "Expected RootsError::Inaccessible, got {err:?}"
        );
    }

    #[test]
    fn test_new_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let err = AllowedRoots::new([dir.path(), file.as_path()]).unwrap_err();

        assert!(matches!(err, RootsError::NotADirectory(ref p) if *p == file));
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_new_normalizes_roots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let dotted = dir.path().join("sub").join("..").join("sub").join(".");

        let roots = AllowedRoots::new([dotted]).unwrap();

        assert_eq!(roots.first(), dir.path().join("sub"));
    }

    #[test]
    fn test_contains() {
        let dir = tempfile::tempdir().unwrap();
        let roots = AllowedRoots::new([dir.path()]).unwrap();

        assert!(roots.contains(dir.path()));
        assert!(roots.contains(&dir.path().join("a/b.png")));
        assert!(!roots.contains(dir.path().parent().unwrap()));
    }

    #[test]
    fn test_display_lists_roots() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let roots = AllowedRoots::new([a.path(), b.path()]).unwrap();

        assert_eq!(
            roots.to_string(),
            format!("{}, {}", a.path().display(), b.path().display())
        );
    }
}
