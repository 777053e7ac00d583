use dioxus::prelude::*;

use crate::core::preferences::Theme;
use crate::services::{use_preferences, use_services};
use crate::t;

pub fn theme_name(theme: Theme) -> String {
    match theme {
        Theme::Light => t!("theme-light"),
        Theme::Dark => t!("theme-dark"),
    }
}

#[component]
pub fn ThemeModal(visible: bool, selected: Theme, on_close: EventHandler) -> Element {
    let services = use_services();
    let prefs = use_preferences();
    let close_icon = prefs().icon_path("close-24x24.svg");

    let options = Theme::ALL.into_iter().map(|theme| {
        let store = services.preferences.clone();
        let name = theme_name(theme);
        let icon = theme.picker_icon();
        let class = if theme == selected {
            "picker__option picker__option--active"
        } else {
            "picker__option"
        };
        rsx! {
            li { key: "{theme.code()}",
                button {
                    r#type: "button",
                    class: "{class}",
                    onclick: move |_| {
                        tracing::info!(%theme, "app theme selected");
                        store.set_theme(theme);
                        on_close.call(());
                    },
                    img { class: "picker__icon", src: "{icon}", alt: "" }
                    span { class: "picker__label", "{name}" }
                }
            }
        }
    });

    rsx! {
        if visible {
            div { class: "modal-backdrop", onclick: move |_| on_close.call(()),
                div {
                    class: "modal picker",
                    role: "dialog",
                    onclick: move |evt| evt.stop_propagation(),
                    div { class: "modal__header",
                        h2 { {t!("theme-title")} }
                        button {
                            r#type: "button",
                            class: "modal__close",
                            onclick: move |_| on_close.call(()),
                            img { src: "{close_icon}", alt: t!("modal-close") }
                        }
                    }
                    ul { class: "picker__options", {options} }
                }
            }
        }
    }
}
