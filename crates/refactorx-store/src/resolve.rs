//! Project root resolution.
//!
//! A root is either a multi-module root definition file or a single module
//! file. Directories are scanned one level deep; entries are considered in
//! file-name order so the choice does not depend on filesystem enumeration.

use crate::errors::{io_error, root_not_found, Result};
use refactorx_core::config::ProjectLayout;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `path` to the definition file a project graph is loaded from.
/// Relative paths are taken from the current directory.
///
/// # Errors
///
/// `RootNotFound` when the path does not exist, names an unrecognized file,
/// or is a directory without any recognized file. `Io` when the directory
/// cannot be listed.
pub fn resolve_root(path: &Path, layout: &ProjectLayout) -> Result<PathBuf> {
    let absolute;
    let path = if path.is_absolute() {
        path
    } else {
        let cwd = std::env::current_dir().map_err(|e| io_error("resolve_root", path, e))?;
        absolute = cwd.join(path);
        absolute.as_path()
    };

    if path.is_file() {
        if layout.is_root_file(path) || layout.is_module_file(path) {
            return Ok(path.to_path_buf());
        }
        return Err(root_not_found(path, "file is not a recognized project definition"));
    }
    if !path.is_dir() {
        return Err(root_not_found(path, "path does not exist"));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(path)
        .map_err(|e| io_error("resolve_root", path, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let dir_name = path.file_name().and_then(|n| n.to_str());
    let roots: Vec<&PathBuf> = files.iter().filter(|p| layout.is_root_file(p)).collect();

    let named_after_dir = roots.iter().find(|p| {
        let stem = p.file_stem().and_then(|s| s.to_str());
        stem.is_some() && stem == dir_name
    });

    let chosen = named_after_dir
        .or_else(|| roots.first())
        .copied()
        .or_else(|| files.iter().find(|p| layout.is_module_file(p)));

    match chosen {
        Some(root) => {
            tracing::debug!(root = %root.display(), "resolved project root");
            Ok(root.clone())
        }
        None => Err(root_not_found(path, "no project definition file in directory")),
    }
}
