use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the filesystem helpers in `fs_op`.
///
/// Every variant records the path it failed on so callers can report it
/// without extra bookkeeping.
#[derive(Error, Debug)]
pub enum FsOpError {
    /// Open/create/read/write/sync failure at the OS boundary.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, or JSON that does not match the target type.
    #[error("unable to decode `{}`: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("unable to encode JSON for `{}`: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The zip archive (or one of its entries) could not be read.
    #[error("unable to read archive `{}`: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// An archive entry name would resolve outside the destination root.
    #[error("archive `{}` contains unsafe entry `{entry}`", archive.display())]
    UnsafeEntry { archive: PathBuf, entry: String },

    /// Some files of a bulk operation failed; the rest were processed.
    #[error("{} of {} files under `{}` failed", failures.len(), failures.len() + succeeded, root.display())]
    Partial {
        root: PathBuf,
        failures: Vec<FsOpError>,
        succeeded: usize,
    },
}

impl FsOpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FsOpError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures at the OS or archive boundary.
    pub fn is_io(&self) -> bool {
        match self {
            FsOpError::Io { .. } | FsOpError::Archive { .. } | FsOpError::UnsafeEntry { .. } => true,
            FsOpError::Partial { failures, .. } => failures.iter().all(FsOpError::is_io),
            FsOpError::Decode { .. } | FsOpError::Encode { .. } => false,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FsOpError::Decode { .. })
    }

    /// The path the error was detected on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            FsOpError::Io { path, .. }
            | FsOpError::Decode { path, .. }
            | FsOpError::Encode { path, .. }
            | FsOpError::Archive { path, .. } => path,
            FsOpError::UnsafeEntry { archive, .. } => archive,
            FsOpError::Partial { root, .. } => root,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsOpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_error_mentions_path() {
        let e = FsOpError::io("/tmp/nope.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(e.is_io());
        assert!(!e.is_decode());
        assert!(e.to_string().contains("/tmp/nope.txt"));
        assert_eq!(e.path(), std::path::Path::new("/tmp/nope.txt"));
    }

    #[test]
    fn partial_counts_failures() {
        let e = FsOpError::Partial {
            root: PathBuf::from("src"),
            failures: vec![FsOpError::io("src/a", io::Error::other("boom"))],
            succeeded: 2,
        };
        assert_eq!(e.to_string(), "1 of 3 files under `src` failed");
        assert!(e.is_io());
    }
}
