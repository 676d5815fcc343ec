//! Output sandbox for svgconv.
//!
//! Every file svgconv writes must land inside one of a fixed set of
//! operator-approved directories. This crate provides:
//!
//! - [`AllowedRoots`]: the validated, immutable set of allowed directories
//! - [`PathAuthorizer`]: membership checks and the redirect policy for
//!   requested paths that fall outside every root
//! - [`ensure_directory`]: creation of missing parent directories before a write
//!
//! # Redirect policy
//!
//! [`PathAuthorizer::resolve_safe`] never fails. A disallowed path is relocated
//! to the first allowed root, keeping only its file name. The returned
//! [`Resolution`] records whether and why that happened so the caller can
//! report it; nothing is logged from here.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use svgconv_sandbox::{AllowedRoots, PathAuthorizer, ensure_directory};
//!
//! let roots = Arc::new(AllowedRoots::new(["/srv/renders"])?);
//! let authorizer = PathAuthorizer::new(roots);
//!
//! let resolution = authorizer.resolve_safe(Path::new("/etc/out.png"));
//! assert_eq!(resolution.path, Path::new("/srv/renders/out.png"));
//! ensure_directory(&resolution.path)?;
//! ```

mod authorizer;
mod error;
mod normalize;
mod roots;

pub use authorizer::{PathAuthorizer, Redirect, RedirectReason, Resolution, ensure_directory};
pub use error::{RootsError, SandboxError};
pub use roots::AllowedRoots;
