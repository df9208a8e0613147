//! Load and store serde documents as JSON files.
//!
//! Failures are classified so that callers can tell a missing file from a
//! file that exists but does not hold the expected document.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not a valid document: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Write `value` to `path`, replacing any previous content.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    to_writer_pretty(&mut writer, value).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    log::debug!("saved document to {:?}", path);
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let value = from_reader(BufReader::new(file)).map_err(|source: serde_json::Error| {
        if source.is_io() {
            StorageError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            StorageError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    log::debug!("loaded document from {:?}", path);
    Ok(value)
}

/// Read a whole document as text, for callers that need to clean it up
/// before handing it to [`parse_json`].
pub fn read_text(path: &Path) -> Result<String, StorageError> {
    std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))
}

/// Parse `raw`, blaming `path` when it does not hold a `T`.
pub fn parse_json<T: DeserializeOwned>(raw: &str, path: &Path) -> Result<T, StorageError> {
    let value = serde_json::from_str(raw).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("parsed document from {:?}", path);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        values: Vec<f64>,
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc = Doc {
            name: "gr".into(),
            values: vec![1.0, 2.5],
        };
        save_json(&doc, &path).unwrap();
        let loaded: Doc = load_json(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_json::<Doc>(&dir.path().join("nope.json"));
        assert!(matches!(res, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{ this is not json").unwrap();
        assert!(matches!(
            load_json::<Doc>(&path),
            Err(StorageError::Malformed { .. })
        ));

        std::fs::write(&path, r#"{"name": 3}"#).unwrap();
        assert!(matches!(
            load_json::<Doc>(&path),
            Err(StorageError::Malformed { .. })
        ));
    }

    #[test]
    fn test_read_then_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        assert!(matches!(read_text(&path), Err(StorageError::NotFound(_))));

        std::fs::write(&path, r#"{"name": "gr", "values": [1]}"#).unwrap();
        let raw = read_text(&path).unwrap();
        let doc: Doc = parse_json(&raw, &path).unwrap();
        assert_eq!(doc.values, vec![1.0]);
        assert!(matches!(
            parse_json::<Doc>("[", &path),
            Err(StorageError::Malformed { path: p, .. }) if p == path
        ));
    }
}
