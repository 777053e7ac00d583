//! Native backend: one JSON object per store, kept in the platform data
//! directory (`~/.local/share/demetra/…` and friends).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::{KeyValueStore, StorageError, StoreDriver};

#[derive(Debug, Clone, Default)]
pub struct FileDriver {
    dir: Option<PathBuf>,
}

impl FileDriver {
    /// Resolve the directory from `directories::ProjectDirs` at open time.
    pub fn new() -> Self {
        Self { dir: None }
    }

    /// Keep store files in `dir` instead of the platform data directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn resolve_dir(&self) -> Result<PathBuf, StorageError> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("me", "Demetra", "Demetra").ok_or_else(|| {
            StorageError::Unavailable("unable to determine data directory".into())
        })?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

impl StoreDriver for FileDriver {
    fn name(&self) -> &'static str {
        "file"
    }

    fn open(
        &self,
        store_name: &str,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>> {
        let dir = self.resolve_dir();
        let file_name = format!("{store_name}.json");
        Box::pin(async move {
            let dir = dir?;
            fs::create_dir_all(&dir)?;
            let store = FileStore::open(dir.join(file_name))?;
            Ok(Rc::new(store) as Rc<dyn KeyValueStore>)
        })
    }
}

/// Whole-file store: the map is cached in memory and rewritten on each change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, Value>>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "unreadable store file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut next = self.entries.borrow().clone();
        next.insert(key.to_string(), value);
        self.flush(&next)?;
        *self.entries.borrow_mut() = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut next = self.entries.borrow().clone();
        if next.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&next)?;
        *self.entries.borrow_mut() = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use futures::executor::block_on;
    use serde_json::json;

    use super::*;

    fn scratch_dir() -> PathBuf {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        std::env::temp_dir().join(format!(
            "demetra-file-store-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn values_survive_a_reopen() {
        let dir = scratch_dir();
        let driver = FileDriver::in_dir(&dir);

        let first = block_on(driver.open("prefs")).unwrap();
        first.set("theme", json!("dark")).unwrap();
        first.set("lang", json!("ua")).unwrap();
        first.remove("lang").unwrap();

        let second = block_on(driver.open("prefs")).unwrap();
        assert_eq!(second.get("theme").unwrap(), Some(json!("dark")));
        assert_eq!(second.keys().unwrap(), vec!["theme".to_string()]);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("prefs.json"), "{ not json").unwrap();

        let store = block_on(FileDriver::in_dir(&dir).open("prefs")).unwrap();
        assert!(store.keys().unwrap().is_empty());

        let _ = fs::remove_dir_all(dir);
    }
}
