use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use zip::read::ZipFile;
use zip::ZipArchive;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::metadata::apply_unix_mode;

/// Totals for a successful `unzip`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files: usize,
    pub dirs: usize,
    pub bytes: u64,
}

/// Extract the zip archive at `src` into `dest_dir`.
///
/// Entries are written in archive order; a later entry with the same name
/// overwrites an earlier one. Recorded Unix modes are applied on Unix.
/// Entry names that would land outside `dest_dir` (absolute paths, `..`
/// segments) abort the extraction with `FsOpError::UnsafeEntry`.
///
/// The first failing entry stops the extraction; entries already written are
/// left on disk.
pub fn unzip<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest_dir: Q) -> Result<ExtractReport> {
    let src = src.as_ref();
    let dest = dest_dir.as_ref();

    let file = File::open(src).map_err(|e| {
        tracing::error!("unable to open archive '{}': {}", src.display(), e);
        FsOpError::io(src, e)
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
        tracing::error!("unable to read archive '{}': {}", src.display(), e);
        FsOpError::Archive {
            path: src.to_path_buf(),
            source: e,
        }
    })?;

    fs::create_dir_all(dest).map_err(|e| {
        tracing::error!("unable to create directory '{}': {}", dest.display(), e);
        FsOpError::io(dest, e)
    })?;

    let mut report = ExtractReport::default();
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| {
            tracing::error!("unable to open entry #{} of '{}': {}", i, src.display(), e);
            FsOpError::Archive {
                path: src.to_path_buf(),
                source: e,
            }
        })?;
        extract_entry(src, dest, entry, &mut report)?;
    }

    tracing::debug!(
        "extracted {} files and {} dirs ({} bytes) from '{}' into '{}'",
        report.files,
        report.dirs,
        report.bytes,
        src.display(),
        dest.display()
    );
    Ok(report)
}

fn extract_entry(
    archive: &Path,
    dest: &Path,
    mut entry: ZipFile<'_>,
    report: &mut ExtractReport,
) -> Result<()> {
    let target = entry_target(archive, dest, &entry)?;
    let mode = entry.unix_mode();

    if entry.is_dir() {
        fs::create_dir_all(&target).map_err(|e| {
            tracing::error!("unable to create directory '{}': {}", target.display(), e);
            FsOpError::io(&target, e)
        })?;
        if let Some(mode) = mode {
            apply_unix_mode(&target, mode)?;
        }
        report.dirs += 1;
        return Ok(());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            tracing::error!("unable to create directory '{}': {}", parent.display(), e);
            FsOpError::io(parent, e)
        })?;
    }
    let mut out = open_for_entry(&target, mode).map_err(|e| {
        tracing::error!("unable to open file '{}': {}", target.display(), e);
        FsOpError::io(&target, e)
    })?;
    let n = io::copy(&mut entry, &mut out).map_err(|e| {
        tracing::error!(
            "unable to copy entry '{}' to '{}': {}",
            entry.name(),
            target.display(),
            e
        );
        FsOpError::io(&target, e)
    })?;
    // An existing file keeps its old mode through O_TRUNC; reapply the recorded one.
    if let Some(mode) = mode {
        apply_unix_mode(&target, mode)?;
    }

    report.files += 1;
    report.bytes += n;
    Ok(())
}

fn entry_target(archive: &Path, dest: &Path, entry: &ZipFile<'_>) -> Result<PathBuf> {
    match entry.enclosed_name() {
        Some(rel) => Ok(dest.join(rel)),
        None => {
            tracing::error!(
                "refusing unsafe entry '{}' in '{}'",
                entry.name(),
                archive.display()
            );
            Err(FsOpError::UnsafeEntry {
                archive: archive.to_path_buf(),
                entry: entry.name().to_string(),
            })
        }
    }
}

#[cfg(unix)]
fn open_for_entry(path: &Path, mode: Option<u32>) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    if let Some(mode) = mode {
        opts.mode(mode & 0o7777);
    }
    opts.open(path)
}

#[cfg(not(unix))]
fn open_for_entry(path: &Path, _mode: Option<u32>) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
