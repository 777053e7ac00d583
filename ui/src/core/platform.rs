//! Platform detection and the local executor used for background work.

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Web,
    Desktop,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Web
        } else {
            Self::Desktop
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Desktop => "desktop",
        }
    }
}

/// Spawns onto the Dioxus runtime's root scope so tasks outlive the component
/// that started them. Must be used from inside a running Dioxus app.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeSpawner;

impl LocalSpawn for RuntimeSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        dioxus::prelude::spawn_forever(future)
            .map(|_| ())
            .ok_or_else(SpawnError::shutdown)
    }
}
