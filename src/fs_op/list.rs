use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::fs_op::error::{FsOpError, Result};

/// Recursively collect every non-directory path under `dir`.
///
/// Entries are visited in file-name order within each directory. Symlinks are
/// not followed, so a link (even one pointing at a directory) is reported as a
/// leaf. Returned paths are `dir` joined with the entry's relative path.
///
/// Failure to read `dir` itself or any directory beneath it aborts the
/// listing.
pub fn list_all_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let root = dir.as_ref();
    // WalkDir never reads a non-directory root, so probe it up front.
    fs::read_dir(root).map_err(|e| {
        tracing::error!("unable to read dir '{}': {}", root.display(), e);
        FsOpError::io(root, e)
    })?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(root).to_path_buf();
            tracing::error!("unable to read dir '{}': {}", at.display(), e);
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            FsOpError::io(at, source)
        })?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }

    tracing::debug!("listed {} files under '{}'", files.len(), root.display());
    Ok(files)
}
