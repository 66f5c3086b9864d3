//! Small filesystem utilities: load JSON config files, check for paths,
//! copy files and directory trees, extract zip archives and rewrite text in
//! place.
//!
//! Every operation returns [`fs_op::Result`]; failures carry the path they
//! happened on and are also reported through `tracing` when detected.

pub mod fs_op;
pub mod logging;

pub use crate::fs_op::{
    copy_dir, copy_file, exists, list_all_files, read_json, read_json_into, replace_in_file,
    unzip, write_json, CopyReport, Existence, ExtractReport, FsOpError, PathType, Result,
};
pub use crate::logging::init_tracing;
