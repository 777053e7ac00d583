//! Browser backend over `window.localStorage`. Keys are namespaced as
//! `{store}/{key}` so several stores can share one origin.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::{KeyValueStore, StorageError, StoreDriver};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageDriver;

impl StoreDriver for LocalStorageDriver {
    fn name(&self) -> &'static str {
        "localstorage"
    }

    fn open(
        &self,
        store_name: &str,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>> {
        let prefix = format!("{store_name}/");
        Box::pin(async move {
            let storage = web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("window unavailable".into()))?
                .local_storage()
                .map_err(|_| StorageError::Unavailable("localStorage access denied".into()))?
                .ok_or_else(|| StorageError::Unavailable("localStorage missing".into()))?;
            Ok(Rc::new(LocalStorageStore { storage, prefix }) as Rc<dyn KeyValueStore>)
        })
    }
}

pub struct LocalStorageStore {
    storage: web_sys::Storage,
    prefix: String,
}

impl LocalStorageStore {
    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw = self
            .storage
            .get_item(&self.full_key(key))
            .map_err(|_| StorageError::Unavailable("localStorage read failed".into()))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&value)?;
        // setItem only throws for QuotaExceededError in practice.
        self.storage
            .set_item(&self.full_key(key), &raw)
            .map_err(|_| StorageError::Quota)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(&self.full_key(key))
            .map_err(|_| StorageError::Unavailable("localStorage remove failed".into()))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self
            .storage
            .length()
            .map_err(|_| StorageError::Unavailable("localStorage length failed".into()))?;
        let mut keys = Vec::new();
        for index in 0..len {
            if let Ok(Some(full)) = self.storage.key(index) {
                if let Some(key) = full.strip_prefix(&self.prefix) {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
