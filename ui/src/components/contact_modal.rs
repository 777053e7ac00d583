use dioxus::prelude::*;

use crate::core::contact::{spawn_submit, ContactField, ContactFlow, FieldError, SubmitStatus};
use crate::services::{use_contact_flow, use_preferences, use_services};
use crate::t;

/// Contact form in a modal dialog.
///
/// The form state comes from the root scope and submissions run on the root
/// executor: closing (or remounting) the modal resets nothing in flight, and
/// the outcome of a request already on its way still lands in the flow.
#[component]
pub fn ContactModal(visible: ReadOnlySignal<bool>, on_close: EventHandler) -> Element {
    let services = use_services();
    let prefs = use_preferences();
    let mut flow = use_contact_flow();

    // Fresh CAPTCHA and idle status every time the modal is shown.
    use_effect(move || {
        if visible() {
            flow.with_mut(|f| f.open(&mut rand::thread_rng()));
        }
    });

    let mut close = move || {
        flow.with_mut(|f| f.close(&mut rand::thread_rng()));
        on_close.call(());
    };

    let send = move |_| {
        let language = prefs.peek().language;
        let transport = services.transport.clone();
        if let Err(err) = spawn_submit(&*services.spawner, flow, transport, Some(language)) {
            tracing::error!(%err, "could not start contact submission");
        }
    };

    let close_icon = prefs().icon_path("close-24x24.svg");
    let status = flow.read().status();
    let (a, b) = flow.read().captcha().operands();
    let captcha_question = t!("contact-captcha-question", a = a, b = b);

    let feedback = match status {
        SubmitStatus::Idle => None,
        SubmitStatus::Sending => Some(("contact-form__status", t!("contact-status-sending"))),
        SubmitStatus::Success => Some((
            "contact-form__status contact-form__status--success",
            t!("contact-status-success"),
        )),
        SubmitStatus::Error => Some((
            "contact-form__status contact-form__status--error",
            t!("contact-status-error"),
        )),
    };

    rsx! {
        if visible() {
            div { class: "modal-backdrop", onclick: move |_| close(),
                div {
                    class: "modal contact-modal",
                    role: "dialog",
                    onclick: move |evt| evt.stop_propagation(),

                    div { class: "modal__header",
                        h2 { {t!("contact-title")} }
                        button {
                            r#type: "button",
                            class: "modal__close",
                            onclick: move |_| close(),
                            img { src: "{close_icon}", alt: t!("modal-close") }
                        }
                    }

                    div { class: "contact-form",
                        {render_field(flow, ContactField::Name, t!("contact-name"), false)}
                        {render_field(flow, ContactField::Email, t!("contact-email"), false)}
                        {render_field(flow, ContactField::Phone, t!("contact-phone"), false)}
                        {render_field(flow, ContactField::Message, t!("contact-message"), true)}
                        {render_field(flow, ContactField::Captcha, captcha_question, false)}

                        div { class: "contact-form__actions",
                            button {
                                r#type: "button",
                                class: "button button--primary",
                                disabled: status == SubmitStatus::Sending,
                                onclick: send,
                                {t!("contact-send")}
                            }
                        }

                        if let Some((class_name, message)) = feedback {
                            p { class: "{class_name}", "{message}" }
                        }
                    }
                }
            }
        }
    }
}

fn render_field(
    mut flow: Signal<ContactFlow>,
    field: ContactField,
    label: String,
    multiline: bool,
) -> Element {
    let (value, error) = {
        let current = flow.read();
        (
            current.form().value(field).to_string(),
            current.visible_error(field).map(error_text),
        )
    };
    let id = format!("contact-{}", field.key());
    let class = if error.is_some() {
        "contact-form__input contact-form__input--invalid"
    } else {
        "contact-form__input"
    };
    let input_type = match field {
        ContactField::Email => "email",
        ContactField::Phone => "tel",
        _ => "text",
    };

    rsx! {
        div { class: "contact-form__field",
            label { r#for: "{id}", "{label}" }
            if multiline {
                textarea {
                    id: "{id}",
                    class: "{class}",
                    value: "{value}",
                    oninput: move |evt| flow.with_mut(|f| f.update(field, evt.value())),
                    onblur: move |_| flow.with_mut(|f| f.touch(field)),
                }
            } else {
                input {
                    id: "{id}",
                    class: "{class}",
                    r#type: input_type,
                    value: "{value}",
                    oninput: move |evt| flow.with_mut(|f| f.update(field, evt.value())),
                    onblur: move |_| flow.with_mut(|f| f.touch(field)),
                }
            }
            if let Some(message) = error {
                span { class: "contact-form__error", "{message}" }
            }
        }
    }
}

fn error_text(error: FieldError) -> String {
    match error {
        FieldError::Required => t!("contact-error-required"),
        FieldError::InvalidEmail => t!("contact-error-email"),
        FieldError::CaptchaMismatch => t!("contact-error-captcha"),
    }
}
