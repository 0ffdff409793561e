//! JSON file loading

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Error type for JSON file loading
#[derive(Debug, thiserror::Error)]
pub enum JsonFileError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object at the top level of {path}")]
    NotAnObject { path: PathBuf },
}

/// Read `path` and return its top-level JSON object
pub fn load_json_file(path: impl AsRef<Path>) -> Result<Map<String, Value>, JsonFileError> {
    let path = path.as_ref();
    match load_json_file_as::<Value>(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(JsonFileError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Read `path` and deserialize it into `T`
pub fn load_json_file_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, JsonFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| JsonFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = serde_json::from_reader(BufReader::new(file)).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "Loaded JSON file");
    Ok(value)
}
