//! A JSON object on disk used as the recent-colors store.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::{Map, Value};
use swatch_core::{KeyValueStore, PickerError};

/// Key-value store backed by a single JSON object file.
///
/// A missing file reads as empty; writes rewrite the whole file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Map<String, Value>, PickerError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(PickerError::Storage(format!(
                    "{}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(PickerError::Serialization(format!(
                "{}: expected a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PickerError> {
        Ok(self
            .read()?
            .get(key)
            .and_then(Value::as_str)
            .map(String::from))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PickerError> {
        let mut map = self.read()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, text)
            .map_err(|e| PickerError::Storage(format!("{}: {e}", self.path.display())))
    }
}
