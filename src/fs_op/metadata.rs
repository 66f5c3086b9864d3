//! Permission helpers used by atomic rewrites and archive extraction.

use std::fs;
use std::path::Path;

use crate::fs_op::error::{FsOpError, Result};

/// Copy permission bits from `src` to `dst`.
pub fn copy_permissions(src: &Path, dst: &Path) -> Result<()> {
    let perms = fs::metadata(src)
        .map_err(|e| FsOpError::io(src, e))?
        .permissions();
    fs::set_permissions(dst, perms).map_err(|e| FsOpError::io(dst, e))
}

/// Apply a Unix mode (as recorded in an archive) to `path`.
///
/// Only the permission bits are used; file-type bits are masked off. On
/// non-Unix targets this is a no-op.
#[cfg(unix)]
pub fn apply_unix_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .map_err(|e| FsOpError::io(path, e))
}

#[cfg(not(unix))]
pub fn apply_unix_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn permissions_follow_source() -> std::result::Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir()?;
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, "hello")?;
        fs::write(&dst, "world")?;
        fs::set_permissions(&src, fs::Permissions::from_mode(0o640))?;

        copy_permissions(&src, &dst)?;
        assert_eq!(fs::metadata(&dst)?.permissions().mode() & 0o777, 0o640);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn unix_mode_masks_file_type_bits() -> std::result::Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir()?;
        let f = dir.path().join("f");
        fs::write(&f, "x")?;
        // 0o100755 = regular file, rwxr-xr-x
        apply_unix_mode(&f, 0o100755)?;
        assert_eq!(fs::metadata(&f)?.permissions().mode() & 0o7777, 0o755);
        Ok(())
    }

    #[test]
    fn missing_source_is_io_error() {
        let dir = tempdir().unwrap();
        let err = copy_permissions(&dir.path().join("nope"), dir.path()).unwrap_err();
        assert!(err.is_io());
    }
}
