use dioxus::prelude::*;

use crate::core::preferences::Language;
use crate::services::{use_preferences, use_services};
use crate::t;

/// Translated display name of a language.
pub fn language_name(language: Language) -> String {
    match language {
        Language::En => t!("language-english"),
        Language::Me => t!("language-montenegrin"),
        Language::Ua => t!("language-ukrainian"),
        Language::Tr => t!("language-turkish"),
        Language::Ru => t!("language-russian"),
    }
}

#[component]
pub fn LanguageModal(visible: bool, selected: Language, on_close: EventHandler) -> Element {
    let services = use_services();
    let prefs = use_preferences();
    let close_icon = prefs().icon_path("close-24x24.svg");

    let options = Language::ALL.into_iter().map(|language| {
        let store = services.preferences.clone();
        let name = language_name(language);
        let flag = language.flag_icon();
        let class = if language == selected {
            "picker__option picker__option--active"
        } else {
            "picker__option"
        };
        rsx! {
            li { key: "{language.code()}",
                button {
                    r#type: "button",
                    class: "{class}",
                    onclick: move |_| {
                        tracing::info!(%language, "app language selected");
                        store.set_language(language);
                        on_close.call(());
                    },
                    img { class: "picker__icon", src: "{flag}", alt: "" }
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
                        h2 { {t!("language-title")} }
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
