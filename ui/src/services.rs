//! App-wide services handed to components through Dioxus context.
//!
//! Call [`use_app_services`] once in the root component. It builds the
//! storage gateway, preference store and contact transport, starts loading
//! the persisted preferences, and mirrors the store into a
//! `Signal<Preferences>` so components re-render on change. Until the load
//! finishes the signal holds the defaults.
//!
//! The contact form state lives here as well, in the root scope, so a layout
//! remount (the desktop shell is keyed by language) never drops a message
//! that is being sent.

use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures::task::LocalSpawn;

use crate::core::config::AppConfig;
use crate::core::contact::ContactFlow;
use crate::core::platform::{Platform, RuntimeSpawner};
use crate::core::preferences::{Language, PreferenceStore, Preferences};
use crate::core::storage::StorageGateway;
use crate::core::transport::{ContactTransport, HttpContactTransport};
use crate::i18n;

#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub preferences: PreferenceStore,
    pub transport: Rc<dyn ContactTransport>,
    /// Root-scope executor for work that must outlive the component starting it.
    pub spawner: Rc<dyn LocalSpawn>,
}

impl AppServices {
    pub fn new(config: AppConfig) -> Self {
        let gateway = Rc::new(StorageGateway::new(config.storage()));
        let spawner: Rc<dyn LocalSpawn> = Rc::new(RuntimeSpawner);
        let preferences = PreferenceStore::new(gateway, spawner.clone());
        let transport: Rc<dyn ContactTransport> =
            Rc::new(HttpContactTransport::from_config(&config));
        tracing::info!(
            platform = Platform::current().as_str(),
            contact_url = %config.contact_url(),
            store = %config.store_name,
            "services ready"
        );
        Self {
            config,
            preferences,
            transport,
            spawner,
        }
    }
}

pub fn use_app_services(make_config: impl FnOnce() -> AppConfig) -> AppServices {
    let services = use_hook(|| {
        let services = AppServices::new(make_config());
        i18n::init();
        // The catalog follows the store, not the OS locale.
        if let Err(err) = i18n::set_language(services.preferences.language()) {
            tracing::warn!(%err, "could not select the default catalog");
        }
        services
    });
    use_context_provider(|| services.clone());

    let prefs = use_signal(|| services.preferences.snapshot());
    use_context_provider(|| prefs);

    let contact = use_signal(|| ContactFlow::new(&mut rand::thread_rng()));
    use_context_provider(|| contact);

    let store = services.preferences.clone();
    let subscription = use_hook(move || {
        let active_language = Cell::new(Language::default());
        let subscription = store.subscribe(move |next: Preferences| {
            if active_language.replace(next.language) != next.language {
                if let Err(err) = i18n::set_language(next.language) {
                    tracing::warn!(language = %next.language, %err, "could not switch catalog");
                }
            }
            let mut prefs = prefs;
            prefs.set(next);
        });

        let loader = store.clone();
        spawn(async move {
            loader.load().await;
        });
        subscription
    });

    let store = services.preferences.clone();
    use_drop(move || store.unsubscribe(subscription));

    services
}

pub fn use_services() -> AppServices {
    use_context::<AppServices>()
}

/// Contact form state shared with the root scope.
pub fn use_contact_flow() -> Signal<ContactFlow> {
    use_context::<Signal<ContactFlow>>()
}

/// Reactive view of the current preferences.
pub fn use_preferences() -> Signal<Preferences> {
    use_context::<Signal<Preferences>>()
}
