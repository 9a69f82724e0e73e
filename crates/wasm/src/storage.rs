//! `localStorage` behind the core `KeyValueStore` trait.

use swatch_core::{KeyValueStore, PickerError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

fn storage_error(e: JsValue) -> PickerError {
    PickerError::Storage(format!("{e:?}"))
}

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Opens the window's `localStorage`. Fails when storage is disabled
    /// (private browsing, sandboxed frames).
    pub fn open() -> Result<Self, PickerError> {
        let window =
            web_sys::window().ok_or_else(|| PickerError::Storage("no global window".into()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| PickerError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, PickerError> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PickerError> {
        self.storage.set_item(key, value).map_err(storage_error)
    }
}
