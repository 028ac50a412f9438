//! Path guard: confines tool path arguments to the sandbox root
//!
//! Known limitation: on case-insensitive filesystems two spellings of
//! the same directory are distinct to the component comparison, so a
//! differently-cased alias of the root is rejected rather than
//! accepted.

use std::path::{Component, Path, PathBuf};

use super::ToolError;

/// A path argument resolved outside the sandbox root
#[derive(Debug, Clone)]
pub struct SandboxError {
    pub path: String,
    pub root: String,
}

impl std::fmt::Display for SandboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot access \"{}\": outside the sandbox root {}",
            self.path, self.root
        )
    }
}

impl std::error::Error for SandboxError {}

/// Resolve a candidate path against the sandbox root.
///
/// The candidate is joined onto the root when relative, normalized
/// (`.`/`..` removed, symlinks in the existing portion resolved), and
/// the result must still be at or beneath the canonical root. Fails
/// closed: a violating path is rejected, never clamped.
pub async fn resolve_in_sandbox(candidate: &str, root: &Path) -> Result<PathBuf, ToolError> {
    let canonical_root = tokio::fs::canonicalize(root).await?;

    let joined = if Path::new(candidate).is_absolute() {
        PathBuf::from(candidate)
    } else {
        canonical_root.join(candidate)
    };

    let absolute = canonicalize_lenient(&normalize(&joined)).await?;

    if !is_within(&absolute, &canonical_root) {
        return Err(ToolError::Sandbox(SandboxError {
            path: candidate.to_string(),
            root: canonical_root.display().to_string(),
        }));
    }

    Ok(absolute)
}

/// Remove `.` and `..` components lexically. Runs before symlink
/// resolution, so a `..` never walks out through a link target.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

/// Canonicalize a path that may not exist yet: resolve the nearest
/// existing ancestor, then re-append the missing remainder.
async fn canonicalize_lenient(path: &Path) -> std::io::Result<PathBuf> {
    if let Ok(resolved) = tokio::fs::canonicalize(path).await {
        return Ok(resolved);
    }

    let mut existing = path.to_path_buf();
    let mut missing: Vec<std::ffi::OsString> = Vec::new();

    loop {
        match tokio::fs::canonicalize(&existing).await {
            Ok(base) => {
                let mut out = base;
                for name in missing.iter().rev() {
                    out.push(name);
                }
                return Ok(out);
            }
            Err(e) => {
                let parent = existing.parent().map(|p| p.to_path_buf());
                let name = existing.file_name().map(|n| n.to_os_string());
                match (parent, name) {
                    (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                        missing.push(name);
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
        }
    }
}

/// Containment check by path components, not string prefix, so
/// `/root-evil` never passes for a root of `/root`.
fn is_within(path: &Path, root: &Path) -> bool {
    let path_components: Vec<_> = path.components().collect();
    let root_components: Vec<_> = root.components().collect();

    if path_components.len() < root_components.len() {
        return false;
    }

    root_components
        .iter()
        .enumerate()
        .all(|(i, c)| path_components.get(i) == Some(c))
}
