use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::ensure_parent_exists;
use crate::fs_op::list::list_all_files;

/// Totals for a successful `copy_dir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub files: usize,
    pub bytes: u64,
}

/// Copy the bytes of `src` to `dest`, creating `dest`'s parent directories.
///
/// `dest` is created or truncated, and synced to disk before returning.
/// Returns the number of bytes copied.
///
/// A directory source (including a symlink to one) is rejected before `dest`
/// is touched, as is a `dest` that is the same file as `src`.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<u64> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    let mut input = File::open(src).map_err(|e| {
        tracing::error!("unable to open file '{}': {}", src.display(), e);
        FsOpError::io(src, e)
    })?;
    let src_meta = input.metadata().map_err(|e| FsOpError::io(src, e))?;
    if src_meta.is_dir() {
        tracing::error!("refusing to copy directory '{}' as a file", src.display());
        return Err(FsOpError::io(
            src,
            io::Error::new(io::ErrorKind::InvalidInput, "source is a directory"),
        ));
    }
    if is_same_file(&src_meta, dest) {
        tracing::error!(
            "refusing to copy '{}' onto itself ('{}')",
            src.display(),
            dest.display()
        );
        return Err(FsOpError::io(
            dest,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "source and destination are the same file",
            ),
        ));
    }
    ensure_parent_exists(dest)?;
    let mut output = File::create(dest).map_err(|e| {
        tracing::error!("unable to create dest file '{}': {}", dest.display(), e);
        FsOpError::io(dest, e)
    })?;

    let n = io::copy(&mut input, &mut output).map_err(|e| {
        tracing::error!(
            "unable to copy '{}' to '{}': {}",
            src.display(),
            dest.display(),
            e
        );
        FsOpError::io(dest, e)
    })?;
    output.sync_all().map_err(|e| {
        tracing::error!("unable to sync '{}': {}", dest.display(), e);
        FsOpError::io(dest, e)
    })?;

    tracing::debug!("copied {} bytes '{}' -> '{}'", n, src.display(), dest.display());
    Ok(n)
}

/// Recursively copy the directory `src` into `dest/<name of src>/`.
///
/// Every file is attempted even when earlier ones fail. If any copy fails the
/// result is `FsOpError::Partial` listing each failure; files copied before
/// and after a failure stay in place.
///
/// Symlinks are not followed by the listing. A link to a file is copied as
/// the target's content; a link to a directory is reported as a failure and
/// nothing is created for it.
pub fn copy_dir<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<CopyReport> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    let files = list_all_files(src).map_err(|e| {
        tracing::error!("unable to list all files under '{}'", src.display());
        e
    })?;
    let target_root = match source_dir_name(src) {
        Some(name) => dest.join(name),
        None => dest.to_path_buf(),
    };

    let mut report = CopyReport::default();
    let mut failures = Vec::new();
    for file in &files {
        // Listed paths are always `src` joined with a relative path.
        let rel = file.strip_prefix(src).unwrap_or(file);
        match copy_file(file, target_root.join(rel)) {
            Ok(n) => {
                report.files += 1;
                report.bytes += n;
            }
            Err(e) => failures.push(e),
        }
    }

    if !failures.is_empty() {
        tracing::error!(
            "{} of {} files under '{}' failed to copy",
            failures.len(),
            files.len(),
            src.display()
        );
        return Err(FsOpError::Partial {
            root: src.to_path_buf(),
            failures,
            succeeded: report.files,
        });
    }
    Ok(report)
}

#[cfg(unix)]
fn is_same_file(src_meta: &fs::Metadata, dest: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match fs::metadata(dest) {
        Ok(d) => d.dev() == src_meta.dev() && d.ino() == src_meta.ino(),
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(_src_meta: &fs::Metadata, _dest: &Path) -> bool {
    false
}

// `.` and `/` have no file name of their own; fall back to the resolved path.
fn source_dir_name(src: &Path) -> Option<PathBuf> {
    if let Some(name) = src.file_name() {
        return Some(PathBuf::from(name));
    }
    fs::canonicalize(src)
        .ok()
        .and_then(|p| p.file_name().map(PathBuf::from))
}
