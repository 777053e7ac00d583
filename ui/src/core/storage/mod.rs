//! Persistence gateway for small, durable UI settings.
//!
//! The gateway hides *where* values live behind an ordered list of drivers.
//! The first driver that opens wins and its handle is shared by every key for
//! the rest of the process. Opening is lazy and single-flight: whichever call
//! arrives first (`init`, `get`, `set`, …) opens the handle while concurrent
//! callers wait on the same lock and then reuse it.
//!
//! Values are `serde_json::Value`s. There is no transaction across keys; each
//! call is atomic for its own key only.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::lock::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

mod memory;
pub use memory::{MemoryDriver, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileDriver, FileStore};

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::{LocalStorageDriver, LocalStorageStore};

/// Failures surfaced by drivers and the gateway.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value could not be (de)serialised: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage quota exceeded")]
    Quota,
    #[error("no storage driver could be opened")]
    NoDriver,
}

/// An opened key-value handle. Implementations are synchronous; the gateway
/// provides the asynchronous surface.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Something that knows how to open a [`KeyValueStore`] for a named store.
pub trait StoreDriver {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn open(
        &self,
        store_name: &str,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>>;
}

/// Store name plus the drivers to try, in order.
pub struct StorageConfig {
    pub name: String,
    pub driver_order: Vec<Box<dyn StoreDriver>>,
}

impl StorageConfig {
    pub fn new(name: impl Into<String>, driver_order: Vec<Box<dyn StoreDriver>>) -> Self {
        Self {
            name: name.into(),
            driver_order,
        }
    }

    /// Browser storage first, then an in-memory map so the app keeps working
    /// (without persistence) when storage is blocked.
    #[cfg(target_arch = "wasm32")]
    pub fn platform_default(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![Box::new(LocalStorageDriver), Box::new(MemoryDriver::new())],
        )
    }

    /// A JSON file under the user's data directory, then an in-memory map.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn platform_default(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![Box::new(FileDriver::new()), Box::new(MemoryDriver::new())],
        )
    }
}

struct OpenedStore {
    driver: &'static str,
    store: Rc<dyn KeyValueStore>,
}

/// Lazily-initialised, driver-agnostic key-value storage.
pub struct StorageGateway {
    config: StorageConfig,
    opened: Mutex<Option<OpenedStore>>,
}

impl StorageGateway {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            opened: Mutex::new(None),
        }
    }

    /// Open the underlying handle if nobody has yet. Idempotent; a failed
    /// attempt leaves the gateway closed so the next call retries.
    pub async fn init(&self) -> Result<(), StorageError> {
        self.store().await.map(|_| ())
    }

    /// Name of the driver that backs this gateway (opens it if needed).
    pub async fn driver_name(&self) -> Result<&'static str, StorageError> {
        self.shared().await.map(|(driver, _)| driver)
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.store().await?.get(key)
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.store().await?.set(key, value)
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store().await?.remove(key)
    }

    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.store().await?.keys()
    }

    /// Typed read. A value that does not deserialize into `T` is an error.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_value(raw)?)),
            None => Ok(None),
        }
    }

    pub async fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_value(value)?;
        self.set(key, raw).await
    }

    async fn store(&self) -> Result<Rc<dyn KeyValueStore>, StorageError> {
        self.shared().await.map(|(_, store)| store)
    }

    /// The shared handle and its driver name, opening it on first use. The
    /// lock is held across the open so concurrent callers wait for it.
    async fn shared(&self) -> Result<(&'static str, Rc<dyn KeyValueStore>), StorageError> {
        let mut slot = self.opened.lock().await;
        if slot.is_none() {
            *slot = Some(self.open_first().await?);
        }
        match slot.as_ref() {
            Some(opened) => Ok((opened.driver, opened.store.clone())),
            None => Err(StorageError::NoDriver),
        }
    }

    async fn open_first(&self) -> Result<OpenedStore, StorageError> {
        for driver in &self.config.driver_order {
            match driver.open(&self.config.name).await {
                Ok(store) => {
                    tracing::debug!(driver = driver.name(), store = %self.config.name, "storage opened");
                    return Ok(OpenedStore {
                        driver: driver.name(),
                        store,
                    });
                }
                Err(err) => {
                    tracing::warn!(driver = driver.name(), %err, "storage driver failed to open, trying next");
                }
            }
        }
        Err(StorageError::NoDriver)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::executor::block_on;
    use futures_channel::oneshot;
    use serde_json::json;

    use super::*;

    /// Counts how many handles it hands out; optionally parks the first open
    /// until the test releases it.
    struct CountingDriver {
        opened: Rc<Cell<u32>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl StoreDriver for CountingDriver {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn open(
            &self,
            _store_name: &str,
        ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>> {
            let opened = self.opened.clone();
            let gate = self.gate.borrow_mut().take();
            Box::pin(async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                opened.set(opened.get() + 1);
                Ok(Rc::new(MemoryStore::default()) as Rc<dyn KeyValueStore>)
            })
        }
    }

    struct BrokenDriver;

    impl StoreDriver for BrokenDriver {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn open(
            &self,
            _store_name: &str,
        ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>> {
            Box::pin(async { Err(StorageError::Unavailable("disabled".into())) })
        }
    }

    /// Refuses the first `failures` opens, then hands out memory stores.
    struct FlakyDriver {
        failures: Cell<u32>,
        opened: Rc<Cell<u32>>,
    }

    impl StoreDriver for FlakyDriver {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn open(
            &self,
            _store_name: &str,
        ) -> LocalBoxFuture<'static, Result<Rc<dyn KeyValueStore>, StorageError>> {
            let remaining = self.failures.get();
            if remaining > 0 {
                self.failures.set(remaining - 1);
                return Box::pin(async { Err(StorageError::Unavailable("not yet".into())) });
            }
            let opened = self.opened.clone();
            Box::pin(async move {
                opened.set(opened.get() + 1);
                Ok(Rc::new(MemoryStore::default()) as Rc<dyn KeyValueStore>)
            })
        }
    }

    fn counting(gate: Option<oneshot::Receiver<()>>) -> (CountingDriver, Rc<Cell<u32>>) {
        let opened = Rc::new(Cell::new(0));
        let driver = CountingDriver {
            opened: opened.clone(),
            gate: RefCell::new(gate),
        };
        (driver, opened)
    }

    #[test]
    fn concurrent_first_init_opens_one_handle() {
        let (tx, rx) = oneshot::channel();
        let (driver, opened) = counting(Some(rx));
        let gateway = StorageGateway::new(StorageConfig::new("test", vec![Box::new(driver)]));

        let (a, b, _) = block_on(async {
            futures::join!(gateway.init(), gateway.init(), async {
                let _ = tx.send(());
            })
        });

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(opened.get(), 1);
    }

    #[test]
    fn every_operation_reuses_the_same_handle() {
        let (driver, opened) = counting(None);
        let gateway = StorageGateway::new(StorageConfig::new("test", vec![Box::new(driver)]));

        block_on(async {
            gateway.set("theme", json!("dark")).await.unwrap();
            assert_eq!(gateway.get("theme").await.unwrap(), Some(json!("dark")));
            assert_eq!(gateway.keys().await.unwrap(), vec!["theme".to_string()]);
            gateway.remove("theme").await.unwrap();
            assert_eq!(gateway.get("theme").await.unwrap(), None);
            gateway.init().await.unwrap();
        });

        assert_eq!(opened.get(), 1);
    }

    #[test]
    fn falls_through_to_the_next_driver() {
        let gateway = StorageGateway::new(StorageConfig::new(
            "test",
            vec![Box::new(BrokenDriver), Box::new(MemoryDriver::new())],
        ));
        assert_eq!(block_on(gateway.driver_name()).unwrap(), "memory");
    }

    #[test]
    fn no_driver_is_an_error() {
        let gateway = StorageGateway::new(StorageConfig::new("test", vec![Box::new(BrokenDriver)]));
        assert!(matches!(block_on(gateway.init()), Err(StorageError::NoDriver)));
        assert!(matches!(
            block_on(gateway.get("lang")),
            Err(StorageError::NoDriver)
        ));
    }

    #[test]
    fn failed_init_leaves_the_gateway_closed_for_a_retry() {
        let opened = Rc::new(Cell::new(0));
        let driver = FlakyDriver {
            failures: Cell::new(1),
            opened: opened.clone(),
        };
        let gateway = StorageGateway::new(StorageConfig::new("test", vec![Box::new(driver)]));

        assert!(matches!(block_on(gateway.init()), Err(StorageError::NoDriver)));
        assert_eq!(opened.get(), 0);

        block_on(gateway.init()).unwrap();
        assert_eq!(block_on(gateway.driver_name()).unwrap(), "flaky");
        block_on(gateway.set("theme", json!("dark"))).unwrap();
        assert_eq!(opened.get(), 1);
    }

    #[test]
    fn typed_helpers_round_trip_through_json() {
        let gateway = StorageGateway::new(StorageConfig::new("test", vec![Box::new(MemoryDriver::new())]));
        block_on(async {
            gateway.set_as("visits", &3u32).await.unwrap();
            assert_eq!(gateway.get_as::<u32>("visits").await.unwrap(), Some(3));
            assert!(gateway.get_as::<u32>("missing").await.unwrap().is_none());
            gateway.set("visits", json!("three")).await.unwrap();
            assert!(matches!(
                gateway.get_as::<u32>("visits").await,
                Err(StorageError::Serialization(_))
            ));
        });
    }
}
