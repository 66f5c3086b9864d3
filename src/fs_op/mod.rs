//! Filesystem helpers.
//!
//! Each submodule covers one operation and can be used on its own; only
//! `copy::copy_dir` composes others (`list` and `copy::copy_file`). All
//! functions are synchronous and release every handle they open before
//! returning.

pub mod copy;
pub mod error;
pub mod helpers;
pub mod json;
pub mod list;
pub mod metadata;
pub mod replace;
pub mod stat;
pub mod unzip;

pub use copy::{copy_dir, copy_file, CopyReport};
pub use error::{FsOpError, Result};
pub use json::{read_json, read_json_into, write_json};
pub use list::list_all_files;
pub use replace::replace_in_file;
pub use stat::{exists, Existence, PathType};
pub use unzip::{unzip, ExtractReport};
