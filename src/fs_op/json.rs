//! Load and persist caller-defined configuration structures as JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::atomic_write;

/// Decode the JSON file at `path` into a new `T`.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let p = path.as_ref();
    let file = File::open(p).map_err(|e| {
        tracing::error!("unable to open '{}': {}", p.display(), e);
        FsOpError::io(p, e)
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        tracing::error!(
            "unable to decode '{}' as {}: {}",
            p.display(),
            std::any::type_name::<T>(),
            e
        );
        FsOpError::Decode {
            path: p.to_path_buf(),
            source: e,
        }
    })
}

/// Decode the JSON file at `path` into `target`.
///
/// `target` is only overwritten when the whole file decodes; on any error it
/// keeps its previous value.
pub fn read_json_into<T: DeserializeOwned, P: AsRef<Path>>(path: P, target: &mut T) -> Result<()> {
    *target = read_json(path)?;
    Ok(())
}

/// Serialize `value` as pretty-printed JSON and write it atomically to `path`.
pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let p = path.as_ref();
    let mut data = serde_json::to_vec_pretty(value).map_err(|e| {
        tracing::error!("unable to encode JSON for '{}': {}", p.display(), e);
        FsOpError::Encode {
            path: p.to_path_buf(),
            source: e,
        }
    })?;
    data.push(b'\n');
    atomic_write(p, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Settings {
        name: String,
        retries: u32,
        tags: Vec<String>,
        limits: BTreeMap<String, f64>,
        proxy: Option<String>,
    }

    fn sample() -> Settings {
        let mut limits = BTreeMap::new();
        limits.insert("cpu".to_string(), 0.5);
        Settings {
            name: "demo".into(),
            retries: 3,
            tags: vec!["a".into(), "b".into()],
            limits,
            proxy: None,
        }
    }

    #[test]
    fn round_trip_through_disk() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested/settings.json");
        write_json(&path, &sample()).unwrap();
        let back: Settings = read_json(&path).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn missing_file_is_io_and_target_untouched() {
        let td = tempdir().unwrap();
        let mut target = sample();
        let err = read_json_into(td.path().join("absent.json"), &mut target).unwrap_err();
        assert!(err.is_io());
        assert_eq!(target, sample());
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("bad.json");
        fs::write(&path, "{ \"name\": ").unwrap();
        let err = read_json::<Settings, _>(&path).unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("wrong.json");
        fs::write(&path, r#"{"name": 7, "retries": "three"}"#).unwrap();
        let mut target = Settings::default();
        let err = read_json_into(&path, &mut target).unwrap_err();
        assert!(err.is_decode());
        assert_eq!(target, Settings::default());
    }

    #[test]
    fn dynamic_value_target() {
        let td = tempdir().unwrap();
        let path = td.path().join("any.json");
        fs::write(&path, r#"{"k": [1, 2, 3]}"#).unwrap();
        let v: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(v["k"][2], 3);
    }
}
