use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::metadata::copy_permissions;
use crate::fs_op::stat;

/// Ensure the parent directory of `p` exists, creating it and its ancestors.
///
/// A parent whose existence cannot be confirmed is assumed present; the
/// following open on the child will then report the real cause.
pub fn ensure_parent_exists(p: &Path) -> Result<()> {
    let parent = match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };
    if stat::exists(parent).unwrap_or(true) {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        tracing::error!("unable to create directory '{}': {}", parent.display(), e);
        FsOpError::io(parent, e)
    })
}

/// Write `data` to `target` atomically: write a temp file in the same
/// directory, sync it, then rename over `target`.
///
/// If `target` already exists its permission bits are carried over to the
/// new file. On failure the temp file is removed and `target` is untouched.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    ensure_parent_exists(target)?;
    let dir = match target.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let replacing = fs::metadata(target).is_ok();

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FsOpError::io(dir, e))?;
    tmp.write_all(data).map_err(|e| FsOpError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| FsOpError::io(tmp.path(), e))?;
    if replacing {
        copy_permissions(target, tmp.path())?;
    }
    // Dropping a NamedTempFile deletes it, so every early return above cleans up.
    tmp.persist(target).map_err(|e| {
        tracing::error!("unable to replace '{}': {}", target.display(), e.error);
        FsOpError::io(target, e.error)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
            .count()
    }

    #[test]
    fn ensure_parent_creates_ancestors() {
        let td = tempdir().unwrap();
        let target = td.path().join("a/b/c/file.txt");
        ensure_parent_exists(&target).unwrap();
        assert!(td.path().join("a/b/c").is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn ensure_parent_of_bare_name_is_noop() {
        ensure_parent_exists(Path::new("file.txt")).unwrap();
    }

    #[test]
    fn atomic_write_creates_and_replaces() {
        let td = tempdir().unwrap();
        let target = td.path().join("out.txt");
        atomic_write(&target, b"first").unwrap();
        atomic_write(&target, b"second").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert_eq!(leftovers(td.path()), 0, "found leftover temp files");
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let target = td.path().join("script.sh");
        fs::write(&target, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o750)).unwrap();

        atomic_write(&target, b"#!/bin/sh\necho hi\n").unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}
