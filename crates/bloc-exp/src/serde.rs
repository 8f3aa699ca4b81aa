use std::fs;
use std::path::{Path, PathBuf};

use bloc_core::errors::{ErrorInfo, VoteError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

fn serde_error(code: &str, err: impl ToString) -> VoteError {
    VoteError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn with_path(err: VoteError, path: &Path) -> VoteError {
    err.with_context("path", path.display().to_string())
}

/// Re-inserts every object's entries in ascending key order, recursively.
fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (key, mut child) in entries {
                sort_keys(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Serializes a value into canonical JSON bytes: object keys sorted at every
/// depth, whatever the declaration or insertion order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, VoteError> {
    let mut value =
        serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    sort_keys(&mut value);
    serde_json::to_vec(&value).map_err(|err| serde_error("json-write", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, VoteError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, VoteError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml-serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, VoteError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml-deserialize", err))
}

/// Reads and parses a YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, VoteError> {
    let bytes = fs::read(path).map_err(|err| with_path(serde_error("yaml-read", err), path))?;
    from_yaml_slice(&bytes).map_err(|err| with_path(err, path))
}

/// Writes `value` as canonical JSON to `dir/file`, creating `dir`.
pub fn write_canonical_json<T: Serialize>(
    value: &T,
    dir: &Path,
    file: &str,
) -> Result<PathBuf, VoteError> {
    fs::create_dir_all(dir).map_err(|err| with_path(serde_error("out-dir", err), dir))?;
    let path = dir.join(file);
    let bytes = to_canonical_json_bytes(value)?;
    fs::write(&path, bytes).map_err(|err| with_path(serde_error("report-write", err), &path))?;
    Ok(path)
}
