//! Shared UI crate for the Demetra landing page. Preference, storage and
//! contact logic lives in [`core`]; components and views build on it.

pub mod core;
pub mod i18n;
pub mod services;
pub mod views;

pub mod components {
    // Header with language/theme/contact buttons (components/app_header.rs)
    pub mod app_header;
    pub use app_header::AppHeader;

    pub mod accordion;
    pub use accordion::{AccordionEntry, AccordionSection};

    pub mod clients_feedbacks;
    pub use clients_feedbacks::{ClientsFeedbacks, Feedback, FeedbackType};

    pub mod contact_modal;
    pub use contact_modal::ContactModal;

    pub mod language_modal;
    pub use language_modal::LanguageModal;

    pub mod theme_modal;
    pub use theme_modal::ThemeModal;
}
