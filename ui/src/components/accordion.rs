use dioxus::prelude::*;

use crate::services::use_preferences;

/// One collapsible row. `icon` is a file name resolved against the current
/// theme's icon folder.
#[derive(Debug, Clone, PartialEq)]
pub struct AccordionEntry {
    pub icon: &'static str,
    pub title: String,
    pub description: String,
}

#[component]
pub fn AccordionSection(heading: String, entries: Vec<AccordionEntry>) -> Element {
    rsx! {
        section { class: "accordion",
            h2 { class: "accordion__heading", "{heading}" }
            for (index, entry) in entries.into_iter().enumerate() {
                AccordionItem { key: "{index}", entry }
            }
        }
    }
}

#[component]
fn AccordionItem(entry: AccordionEntry) -> Element {
    let prefs = use_preferences();
    let mut expanded = use_signal(|| false);
    let icon = prefs().icon_path(entry.icon);
    let class = if expanded() {
        "accordion__item accordion__item--open"
    } else {
        "accordion__item"
    };

    rsx! {
        div { class: "{class}",
            button {
                r#type: "button",
                class: "accordion__toggle",
                aria_expanded: "{expanded()}",
                onclick: move |_| {
                    let open = expanded();
                    expanded.set(!open);
                },
                img { class: "accordion__icon", src: "{icon}", alt: "" }
                span { class: "accordion__title", "{entry.title}" }
            }
            if expanded() {
                p { class: "accordion__description", "{entry.description}" }
            }
        }
    }
}
