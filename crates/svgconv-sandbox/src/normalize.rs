//! Lexical path normalization.
//!
//! Paths are compared without touching the filesystem: output files usually
//! do not exist yet, and symlinks are not followed.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `cwd` and remove `.` and `..` segments.
///
/// `..` at the filesystem root stays at the root.
pub(crate) fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined;
    let path = if path.is_absolute() {
        path
    } else {
        joined = cwd.join(path);
        &joined
    };

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
        }
    }
    normalized
}

/// Whether `path` is `base` or lies beneath it, component-wise.
///
/// Component matching means `/a/b` contains `/a/b/c` but not `/a/bc`.
pub(crate) fn is_within(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

/// Whether `path` lies beneath `base` and is not `base` itself.
pub(crate) fn is_strictly_within(path: &Path, base: &Path) -> bool {
    path != base && path.starts_with(base)
}
