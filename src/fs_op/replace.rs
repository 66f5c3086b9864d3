use std::fs;
use std::path::Path;

use memchr::memmem::Finder;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::atomic_write;

/// Replace every non-overlapping occurrence of `old` with `new` in the file
/// at `path`, returning the number of replacements.
///
/// Content is treated as raw bytes, so files that are not valid UTF-8 are
/// fine. Symlinks are resolved first and the file they point at is the one
/// rewritten. The rewrite goes through a temp file and a rename, and keeps
/// the file's permission bits. A file with no occurrences (or an empty `old`)
/// is not rewritten at all.
pub fn replace_in_file<P: AsRef<Path>>(path: P, old: &str, new: &str) -> Result<usize> {
    let p = path.as_ref();
    let target = fs::canonicalize(p).map_err(|e| {
        tracing::error!("unable to resolve file '{}': {}", p.display(), e);
        FsOpError::io(p, e)
    })?;
    let content = fs::read(&target).map_err(|e| {
        tracing::error!("unable to read file '{}': {}", target.display(), e);
        FsOpError::io(&target, e)
    })?;
    if old.is_empty() {
        return Ok(0);
    }

    let (replaced, count) = replace_bytes(&content, old.as_bytes(), new.as_bytes());
    if count == 0 {
        tracing::debug!("no occurrences of {:?} in '{}'", old, p.display());
        return Ok(0);
    }

    atomic_write(&target, &replaced).map_err(|e| {
        tracing::error!("unable to write file '{}'", target.display());
        e
    })?;
    tracing::debug!("replaced {} occurrences in '{}'", count, target.display());
    Ok(count)
}

// Literal, non-overlapping, left-to-right replacement. `old` must be non-empty.
fn replace_bytes(haystack: &[u8], old: &[u8], new: &[u8]) -> (Vec<u8>, usize) {
    let finder = Finder::new(old);
    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0;
    let mut count = 0;
    for start in finder.find_iter(haystack) {
        out.extend_from_slice(&haystack[last..start]);
        out.extend_from_slice(new);
        last = start + old.len();
        count += 1;
    }
    out.extend_from_slice(&haystack[last..]);
    (out, count)
}
