//! Theme and language preferences.
//!
//! [`PreferenceStore`] is the single source of truth for the current
//! [`Preferences`]. Reads are synchronous and never wait on storage: the store
//! starts at the defaults, `load()` replaces them once the persisted values
//! arrive, and `set_*` updates memory first and only then schedules the
//! (fire-and-forget) write through the [`StorageGateway`]. A failed write is
//! logged and the in-memory value stays.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use futures::task::{LocalSpawn, LocalSpawnExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::storage::StorageGateway;

pub const LOCAL_LANGUAGE_KEY: &str = "lang";
pub const LOCAL_THEME_KEY: &str = "theme";

/// A stored code that names no known theme or language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference code `{0}`")]
pub struct UnknownCode(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn code(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Folder under `assets/icons/` holding icons drawn for this theme.
    pub fn icon_folder(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Class put on the application root.
    pub fn css_class(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    /// Icon shown for this option in the theme picker.
    pub fn picker_icon(self) -> &'static str {
        match self {
            Theme::Dark => "assets/icons/dark-mode-24x24.svg",
            Theme::Light => "assets/icons/light-mode-24x24.svg",
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownCode;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.code() == code)
            .ok_or_else(|| UnknownCode(code.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Me,
    Ua,
    Tr,
    Ru,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Me,
        Language::Ua,
        Language::Tr,
        Language::Ru,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Me => "me",
            Language::Ua => "ua",
            Language::Tr => "tr",
            Language::Ru => "ru",
        }
    }

    /// Locale folder of the Fluent catalog backing this language.
    pub fn locale(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Me => "cnr-ME",
            Language::Ua => "uk-UA",
            Language::Tr => "tr-TR",
            Language::Ru => "ru-RU",
        }
    }

    pub fn flag_icon(self) -> String {
        format!("assets/icons/{}-24x24.svg", self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownCode;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.code() == code)
            .ok_or_else(|| UnknownCode(code.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Snapshot of every preference. Replaced wholesale, never patched in place
/// by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
}

impl Preferences {
    pub fn icon_folder(&self) -> &'static str {
        self.theme.icon_folder()
    }

    /// `assets/icons/{light|dark}/{name}` for the current theme.
    pub fn icon_path(&self, name: &str) -> String {
        format!("assets/icons/{}/{name}", self.icon_folder())
    }
}

/// Handle returned by [`PreferenceStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Rc<dyn Fn(Preferences)>;

struct Inner {
    state: Cell<Preferences>,
    // Bumped on every explicit set so an in-flight load can tell it lost the race.
    theme_version: Cell<u64>,
    language_version: Cell<u64>,
    gateway: Rc<StorageGateway>,
    spawner: Rc<dyn LocalSpawn>,
    listeners: RefCell<Vec<(Subscription, Listener)>>,
    next_subscription: Cell<u64>,
}

/// Shared, cheaply clonable preference store.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Rc<Inner>,
}

impl PreferenceStore {
    pub fn new(gateway: Rc<StorageGateway>, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: Cell::new(Preferences::default()),
                theme_version: Cell::new(0),
                language_version: Cell::new(0),
                gateway,
                spawner,
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> Preferences {
        self.inner.state.get()
    }

    pub fn theme(&self) -> Theme {
        self.snapshot().theme
    }

    pub fn language(&self) -> Language {
        self.snapshot().language
    }

    pub fn icon_folder(&self) -> &'static str {
        self.snapshot().icon_folder()
    }

    pub fn icon_path(&self, name: &str) -> String {
        self.snapshot().icon_path(name)
    }

    pub fn set_theme(&self, theme: Theme) {
        bump(&self.inner.theme_version);
        self.update(|prefs| prefs.theme = theme);
        self.persist(LOCAL_THEME_KEY, theme.code());
    }

    pub fn set_language(&self, language: Language) {
        bump(&self.inner.language_version);
        self.update(|prefs| prefs.language = language);
        self.persist(LOCAL_LANGUAGE_KEY, language.code());
    }

    /// Replace both preferences at once; listeners see a single snapshot.
    pub fn set(&self, preferences: Preferences) {
        bump(&self.inner.theme_version);
        bump(&self.inner.language_version);
        self.update(|prefs| *prefs = preferences);
        self.persist(LOCAL_THEME_KEY, preferences.theme.code());
        self.persist(LOCAL_LANGUAGE_KEY, preferences.language.code());
    }

    /// Read both preferences from storage and apply them. Missing, malformed
    /// or unreadable values fall back to the defaults. A preference the user
    /// set while the load was in flight keeps the user's value.
    pub async fn load(&self) -> Preferences {
        let theme_version = self.inner.theme_version.get();
        let language_version = self.inner.language_version.get();

        let theme: Theme = self.read(LOCAL_THEME_KEY).await;
        let language: Language = self.read(LOCAL_LANGUAGE_KEY).await;

        let inner = &self.inner;
        self.update(|prefs| {
            if inner.theme_version.get() == theme_version {
                prefs.theme = theme;
            }
            if inner.language_version.get() == language_version {
                prefs.language = language;
            }
        });
        tracing::debug!(theme = %self.theme(), language = %self.language(), "preferences loaded");
        self.snapshot()
    }

    /// Call `listener` with the fresh snapshot after every change.
    pub fn subscribe(&self, listener: impl Fn(Preferences) + 'static) -> Subscription {
        let id = self.inner.next_subscription.get();
        self.inner.next_subscription.set(id + 1);
        let subscription = Subscription(id);
        self.inner
            .listeners
            .borrow_mut()
            .push((subscription, Rc::new(listener)));
        subscription
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    fn update(&self, apply: impl FnOnce(&mut Preferences)) {
        let previous = self.inner.state.get();
        let mut next = previous;
        apply(&mut next);
        if next == previous {
            return;
        }
        self.inner.state.set(next);

        // Listeners may subscribe or set again; call them from a snapshot.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(next);
        }
    }

    async fn read<T>(&self, key: &'static str) -> T
    where
        T: FromStr<Err = UnknownCode> + Default,
    {
        match self.inner.gateway.get(key).await {
            Ok(Some(Value::String(code))) => code.parse().unwrap_or_else(|err| {
                tracing::debug!(key, %err, "ignoring stored preference");
                T::default()
            }),
            Ok(Some(other)) => {
                tracing::debug!(key, value = %other, "ignoring non-string stored preference");
                T::default()
            }
            Ok(None) => T::default(),
            Err(err) => {
                tracing::warn!(key, %err, "could not read stored preference, using default");
                T::default()
            }
        }
    }

    fn persist(&self, key: &'static str, code: &'static str) {
        let gateway = self.inner.gateway.clone();
        let write = async move {
            if let Err(err) = gateway.set(key, Value::from(code)).await {
                tracing::warn!(key, %err, "preference not persisted, keeping in-memory value");
            }
        };
        if let Err(err) = self.inner.spawner.spawn_local(write) {
            tracing::warn!(key, %err, "could not schedule preference write");
        }
    }
}

fn bump(version: &Cell<u64>) {
    version.set(version.get().wrapping_add(1));
}
