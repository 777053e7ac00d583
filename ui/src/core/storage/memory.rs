//! In-process store. Used by tests and as the last-resort driver when no
//! durable backend can be opened.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::{KeyValueStore, StorageError, StoreDriver};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Opens a [`MemoryStore`]. Every open of the same driver shares one store, so
/// callers holding the driver's store can seed or inspect it.
#[derive(Debug, Default, Clone)]
pub struct MemoryDriver {
    store: Rc<MemoryStore>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Rc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Rc<MemoryStore> {
        self.store.clone()
    }
}

impl StoreDriver for MemoryDriver {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn open(
        &self,
        _store_name: &str,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>> {
        let store: Rc<dyn KeyValueStore> = self.store.clone();
        Box::pin(async move { Ok(store) })
    }
}
