use dioxus::prelude::*;

use crate::services::use_preferences;
use crate::t;

/// Who left a testimonial; decides the avatar shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Person,
    Organization,
    Anonymous,
}

impl FeedbackType {
    /// Avatar file name, resolved against the current theme's icon folder.
    pub fn avatar(self) -> &'static str {
        match self {
            FeedbackType::Person => "person-24x24.svg",
            FeedbackType::Organization => "organization-24x24.svg",
            FeedbackType::Anonymous => "anonymous-24x24.svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackType,
    pub name: String,
    pub text: String,
}

/// Testimonials shown on the landing page, translated for the active language.
pub fn feedback_list() -> Vec<Feedback> {
    vec![
        Feedback {
            kind: FeedbackType::Person,
            name: t!("feedback-person-name"),
            text: t!("feedback-person-text"),
        },
        Feedback {
            kind: FeedbackType::Organization,
            name: t!("feedback-organization-name"),
            text: t!("feedback-organization-text"),
        },
        Feedback {
            kind: FeedbackType::Anonymous,
            name: t!("feedback-anonymous-name"),
            text: t!("feedback-anonymous-text"),
        },
    ]
}

#[component]
pub fn ClientsFeedbacks(heading: String, feedbacks: Vec<Feedback>) -> Element {
    let prefs = use_preferences();
    let current = prefs();

    rsx! {
        section { class: "feedbacks",
            h2 { class: "feedbacks__heading", "{heading}" }
            ul { class: "feedbacks__list",
                for (index, feedback) in feedbacks.into_iter().enumerate() {
                    li { key: "{index}", class: "feedback",
                        img {
                            class: "feedback__avatar",
                            src: current.icon_path(feedback.kind.avatar()),
                            alt: "",
                        }
                        div {
                            p { class: "feedback__text", "{feedback.text}" }
                            span { class: "feedback__name", "{feedback.name}" }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::{Preferences, Theme};

    #[test]
    fn avatar_follows_kind_and_theme() {
        let dark = Preferences {
            theme: Theme::Dark,
            ..Preferences::default()
        };
        assert_eq!(
            dark.icon_path(FeedbackType::Organization.avatar()),
            "assets/icons/dark/organization-24x24.svg"
        );
        assert_eq!(
            Preferences::default().icon_path(FeedbackType::Person.avatar()),
            "assets/icons/light/person-24x24.svg"
        );
        assert_eq!(FeedbackType::Anonymous.avatar(), "anonymous-24x24.svg");
    }

    #[test]
    fn list_covers_every_kind_with_text() {
        crate::i18n::init();
        let list = feedback_list();
        let kinds: Vec<_> = list.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FeedbackType::Person,
                FeedbackType::Organization,
                FeedbackType::Anonymous
            ]
        );
        assert!(list.iter().all(|f| !f.name.is_empty() && !f.text.is_empty()));
    }
}
