use std::fs;
use std::io;
use std::path::Path;

use crate::fs_op::error::{FsOpError, Result};

/// Outcome of looking a path up on disk.
///
/// Absence is only reported when the lookup positively says "not found".
/// Any other failure is `Unknown`, which callers must treat as present so
/// that an unreadable path is never mistaken for a free one.
#[derive(Debug)]
pub enum Existence {
    Present,
    Absent,
    Unknown(io::Error),
}

impl Existence {
    /// Stat `path` (following symlinks) and classify the result.
    pub fn probe<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path.as_ref()) {
            Ok(_) => Existence::Present,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Existence::Absent,
            Err(e) => Existence::Unknown(e),
        }
    }

    /// Conservative answer: only `Absent` yields `false`.
    pub fn assume_present(&self) -> bool {
        !matches!(self, Existence::Absent)
    }
}

/// Return whether `path` resolves to any filesystem object.
///
/// `Ok(false)` means the lookup reported "not found". An `Err` means absence
/// could not be confirmed; treat it as existing (`exists(p).unwrap_or(true)`).
pub fn exists<P: AsRef<Path>>(path: P) -> Result<bool> {
    let p = path.as_ref();
    match Existence::probe(p) {
        Existence::Present => Ok(true),
        Existence::Absent => Ok(false),
        Existence::Unknown(e) => {
            tracing::error!("unable to stat '{}': {}", p.display(), e);
            Err(FsOpError::io(p, e))
        }
    }
}

/// Lightweight classification of a filesystem path's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// The lookup reported "not found".
    NotFound,
    Directory,
    File,
    /// Exists but is neither a regular file nor a directory (socket, FIFO...).
    Other,
    /// The lookup failed for another reason; treat as present.
    Unknown,
}

impl PathType {
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path.as_ref()) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => PathType::NotFound,
            Err(_) => PathType::Unknown,
            Ok(m) if m.is_dir() => PathType::Directory,
            Ok(m) if m.is_file() => PathType::File,
            Ok(_) => PathType::Other,
        }
    }
}

pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::Directory
}

pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::File
}
