use crate::components::{ContactModal, LanguageModal, ThemeModal};
use crate::services::use_preferences;
use crate::t;
use dioxus::prelude::*;

// Header stylesheet (inlined as well in release native builds)
const HEADER_CSS: Asset = asset!("/assets/styling/header.css");
const HEADER_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/header.css"
));

/// Sticky page header: brand plus the language, theme and contact buttons.
///
/// Owns the visibility of the three modals. The contact modal stays mounted
/// while hidden so a submission started from it finishes even after the
/// visitor closes it.
#[component]
pub fn AppHeader() -> Element {
    let prefs = use_preferences();
    let mut show_language = use_signal(|| false);
    let mut show_theme = use_signal(|| false);
    let mut show_contact = use_signal(|| false);

    let current = prefs();
    let logo = current.icon_path("logo-36x36.svg");
    let theme_icon = current.theme.picker_icon();
    let flag_icon = current.language.flag_icon();

    rsx! {
        document::Link { rel: "stylesheet", href: HEADER_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{HEADER_CSS_INLINE}" }
        }

        header { id: "header", class: "header",
            div { class: "header__inner",
                div { class: "header__brand",
                    img { class: "header__logo", src: "{logo}", alt: "" }
                    span { class: "header__brand-mark", "Demetra" }
                    span { class: "header__brand-subtitle", {t!("header-tagline")} }
                }

                nav { class: "header__actions",
                    button {
                        r#type: "button",
                        class: "header__icon-button",
                        title: t!("header-language"),
                        onclick: move |_| show_language.set(true),
                        img { src: "{flag_icon}", alt: "" }
                    }
                    button {
                        r#type: "button",
                        class: "header__icon-button",
                        title: t!("header-theme"),
                        onclick: move |_| show_theme.set(true),
                        img { src: "{theme_icon}", alt: "" }
                    }
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        onclick: move |_| show_contact.set(true),
                        {t!("header-contact")}
                    }
                }
            }
        }

        LanguageModal {
            visible: show_language(),
            selected: current.language,
            on_close: move |_| show_language.set(false),
        }
        ThemeModal {
            visible: show_theme(),
            selected: current.theme,
            on_close: move |_| show_theme.set(false),
        }
        ContactModal {
            visible: show_contact(),
            on_close: move |_| show_contact.set(false),
        }
    }
}
