//! Browser storage adapter
//!
//! Wraps any JS object with the Web Storage `getItem`/`setItem` shape
//! (normally `window.localStorage`) as a [`KeyValueStore`].

use wasm_bindgen::prelude::*;
use wellness_metrics_shared::{KeyValueStore, StorageError};

#[wasm_bindgen]
extern "C" {
    /// Web Storage compatible object
    pub type JsStorage;

    #[wasm_bindgen(method, catch, js_name = getItem)]
    fn get_item(this: &JsStorage, key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setItem)]
    fn set_item(this: &JsStorage, key: &str, value: &str) -> Result<(), JsValue>;
}

/// [`KeyValueStore`] backed by a JS storage object
pub struct BrowserStorage {
    inner: JsStorage,
}

impl BrowserStorage {
    pub fn new(inner: JsStorage) -> Self {
        Self { inner }
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// `setItem` throws `QuotaExceededError` when full; anything else is a backend fault
fn write_error(message: String) -> StorageError {
    if message.contains("QuotaExceeded") {
        StorageError::QuotaExceeded(message)
    } else {
        StorageError::Backend(message)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| write_error(describe(&e)))
    }
}
