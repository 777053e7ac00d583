use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use ui::components::AppHeader;
use ui::core::config::AppConfig;
use ui::services::{use_app_services, use_preferences};
use ui::views::Home;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
    #[route("/")]
    Home {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    if let Err(err) = dioxus::logger::init(log_level()) {
        eprintln!("[demetra] logger already initialised: {err}");
    }
    dioxus::launch(App);
}

fn log_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

#[component]
fn App() -> Element {
    use_app_services(AppConfig::from_env);

    rsx! {
        // Shared theme, embedded so web and desktop render identically
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// Web layout: themed root, shared header, routed page.
#[component]
fn WebShell() -> Element {
    let prefs = use_preferences();
    let current = prefs();

    rsx! {
        div {
            class: "app {current.theme.css_class()}",
            lang: current.language.code(),
            AppHeader {}
            Outlet::<Route> {}
        }
    }
}
