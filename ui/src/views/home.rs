use dioxus::prelude::*;

use crate::components::clients_feedbacks::feedback_list;
use crate::components::{AccordionEntry, AccordionSection, ClientsFeedbacks};
use crate::services::use_preferences;
use crate::t;

#[cfg(debug_assertions)]
fn log_home_render(language: &str, theme: &str) {
    // Lightweight render trace for diagnosing preference refresh issues.
    tracing::debug!("Home render (lang={language}, theme={theme})");
}

#[component]
pub fn Home() -> Element {
    // Subscribing here re-renders every translated string on a language change.
    let prefs = use_preferences();
    let current = prefs();

    #[cfg(debug_assertions)]
    {
        log_home_render(current.language.code(), current.theme.code());
    }

    let services = vec![
        AccordionEntry {
            icon: "computer-36x36.svg",
            title: t!("services-software-title"),
            description: t!("services-software-description"),
        },
        AccordionEntry {
            icon: "company-36x36.svg",
            title: t!("services-company-title"),
            description: t!("services-company-description"),
        },
        AccordionEntry {
            icon: "computer-36x36.svg",
            title: t!("services-support-title"),
            description: t!("services-support-description"),
        },
    ];

    let assistance = vec![
        AccordionEntry {
            icon: "company-36x36.svg",
            title: t!("assistance-relocation-title"),
            description: t!("assistance-relocation-description"),
        },
        AccordionEntry {
            icon: "computer-36x36.svg",
            title: t!("assistance-accounting-title"),
            description: t!("assistance-accounting-description"),
        },
    ];

    let hero_image = current.icon_path("demetra-hero.svg");

    rsx! {
        section { class: "page page-home",
            div { class: "intro",
                div { class: "intro__text",
                    h1 { {t!("intro-title")} }
                    p { {t!("intro-subtitle")} }
                }
                img { class: "intro__image", src: "{hero_image}", alt: "" }
            }

            AccordionSection { heading: t!("services-heading"), entries: services }
            AccordionSection { heading: t!("assistance-heading"), entries: assistance }

            ClientsFeedbacks { heading: t!("feedbacks-heading"), feedbacks: feedback_list() }

            section { class: "about",
                h2 { {t!("about-heading")} }
                p { {t!("about-body")} }
            }
        }
    }
}
