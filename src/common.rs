use anyhow::Result;
use std::path::{Path, PathBuf};

// Converts a relative path to an absolute path.
pub fn make_path_absolute(p: &Path) -> Result<PathBuf> {
    if p.is_relative() {
        Ok(std::env::current_dir()?.join(p))
    } else {
        Ok(p.to_owned())
    }
}

/// Resolves an optional user-supplied tool path.
///
/// An explicit path is made absolute so it keeps working regardless of the
/// child's working directory. Without one, `default` is looked up in `PATH`.
pub fn resolve_program(path: Option<&Path>, default: &str) -> Result<PathBuf> {
    match path {
        Some(p) => make_path_absolute(p),
        None => Ok(PathBuf::from(default)),
    }
}
