#![cfg(not(target_arch = "wasm32"))]
//! Preferences written in one "session" are picked up by the next one
//! through the file-backed gateway, and a broken file backend degrades to the
//! in-memory driver without losing the session's choices.

use std::path::PathBuf;
use std::rc::Rc;

use futures::executor::LocalPool;
use ui::core::preferences::{Language, PreferenceStore, Preferences, Theme};
use ui::core::storage::{FileDriver, MemoryDriver, StorageConfig, StorageGateway};

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("demetra-sessions-{tag}-{}", std::process::id()))
}

fn session(drivers: StorageConfig) -> (LocalPool, PreferenceStore) {
    let pool = LocalPool::new();
    let gateway = Rc::new(StorageGateway::new(drivers));
    let store = PreferenceStore::new(gateway, Rc::new(pool.spawner()));
    (pool, store)
}

#[test]
fn choices_survive_a_restart() {
    let dir = scratch_dir("restart");
    let config = || StorageConfig::new("prefs", vec![Box::new(FileDriver::in_dir(&dir))]);

    {
        let (mut pool, store) = session(config());
        pool.run_until(store.load());
        assert_eq!(store.snapshot(), Preferences::default());

        store.set_theme(Theme::Dark);
        store.set_language(Language::Ua);
        pool.run_until_stalled();
    }

    let (mut pool, store) = session(config());
    assert_eq!(store.theme(), Theme::Light, "defaults until the load lands");
    let loaded = pool.run_until(store.load());
    assert_eq!(
        loaded,
        Preferences {
            theme: Theme::Dark,
            language: Language::Ua,
        }
    );
    assert_eq!(store.icon_path("close-24x24.svg"), "assets/icons/dark/close-24x24.svg");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unusable_directory_falls_back_to_memory() {
    // A regular file where the store directory should be.
    let blocker = scratch_dir("blocked");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let gateway = Rc::new(StorageGateway::new(StorageConfig::new(
        "prefs",
        vec![
            Box::new(FileDriver::in_dir(blocker.join("nested"))),
            Box::new(MemoryDriver::new()),
        ],
    )));
    let mut pool = LocalPool::new();
    assert_eq!(pool.run_until(gateway.driver_name()).unwrap(), "memory");

    let store = PreferenceStore::new(gateway, Rc::new(pool.spawner()));
    store.set_language(Language::Tr);
    pool.run_until_stalled();
    assert_eq!(pool.run_until(store.load()).language, Language::Tr);

    let _ = std::fs::remove_file(blocker);
}
