//! Contact form model: field validation, the arithmetic CAPTCHA and the
//! submission state machine.
//!
//! An attempt moves `Idle → Sending → Success | Error`. Closing the form
//! resets it to `Idle` with a fresh CAPTCHA but never cancels a request that
//! is already on the wire; its outcome is still applied when it lands.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use dioxus::prelude::{Signal, Writable};
use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::preferences::Language;
use super::transport::{ContactTransport, SubmitError};

/// Local part and dot-separated host labels, as browsers validate
/// `type=email` inputs. Length limits are checked separately.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

pub fn is_valid_email(candidate: &str) -> bool {
    let Some((local, _)) = candidate.split_once('@') else {
        return false;
    };
    candidate.len() <= MAX_EMAIL_LEN
        && local.len() <= MAX_LOCAL_PART_LEN
        && EMAIL_PATTERN.is_match(candidate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
    Captcha,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Message,
        ContactField::Captcha,
    ];

    /// Form control name / DOM id suffix.
    pub fn key(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Message => "message",
            ContactField::Captcha => "captcha",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    CaptchaMismatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub value: String,
    pub touched: bool,
}

impl Field {
    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Two operands in `1..=10`; the visitor must type their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captcha {
    a: u32,
    b: u32,
}

impl Captcha {
    pub const MIN_OPERAND: u32 = 1;
    pub const MAX_OPERAND: u32 = 10;

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: rng.gen_range(Self::MIN_OPERAND..=Self::MAX_OPERAND),
            b: rng.gen_range(Self::MIN_OPERAND..=Self::MAX_OPERAND),
        }
    }

    pub fn operands(&self) -> (u32, u32) {
        (self.a, self.b)
    }

    pub fn answer(&self) -> u32 {
        self.a + self.b
    }

    /// Whether `input` is a number equal to the expected sum.
    pub fn accepts(&self, input: &str) -> bool {
        input
            .trim()
            .parse::<u32>()
            .map_or(false, |value| value == self.answer())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: Field,
    email: Field,
    phone: Field,
    message: Field,
    captcha: Field,
}

impl ContactForm {
    pub fn field(&self, field: ContactField) -> &Field {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Message => &self.message,
            ContactField::Captcha => &self.captcha,
        }
    }

    fn field_mut(&mut self, field: ContactField) -> &mut Field {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Message => &mut self.message,
            ContactField::Captcha => &mut self.captcha,
        }
    }

    pub fn value(&self, field: ContactField) -> &str {
        &self.field(field).value
    }

    pub fn update(&mut self, field: ContactField, value: impl Into<String>) {
        self.field_mut(field).value = value.into();
    }

    pub fn touch(&mut self, field: ContactField) {
        self.field_mut(field).touched = true;
    }

    pub fn mark_all_touched(&mut self) {
        for field in ContactField::ALL {
            self.touch(field);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }

    pub fn error(&self, field: ContactField, captcha: &Captcha) -> Option<FieldError> {
        let current = self.field(field);
        if current.is_blank() {
            return Some(FieldError::Required);
        }
        match field {
            ContactField::Email if !is_valid_email(current.value.trim()) => {
                Some(FieldError::InvalidEmail)
            }
            ContactField::Captcha if !captcha.accepts(&current.value) => {
                Some(FieldError::CaptchaMismatch)
            }
            _ => None,
        }
    }

    pub fn errors(&self, captcha: &Captcha) -> BTreeMap<ContactField, FieldError> {
        ContactField::ALL
            .into_iter()
            .filter_map(|field| self.error(field, captcha).map(|err| (field, err)))
            .collect()
    }

    pub fn is_valid(&self, captcha: &Captcha) -> bool {
        self.errors(captcha).is_empty()
    }

    fn payload(&self, language: Option<Language>) -> ContactPayload {
        ContactPayload {
            name: self.name.value.trim().to_string(),
            email: self.email.value.trim().to_string(),
            phone: self.phone.value.trim().to_string(),
            message: self.message.value.trim().to_string(),
            language,
        }
    }
}

/// Body of the `send-email` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFlow {
    form: ContactForm,
    captcha: Captcha,
    status: SubmitStatus,
}

impl ContactFlow {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            form: ContactForm::default(),
            captcha: Captcha::generate(rng),
            status: SubmitStatus::Idle,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn captcha(&self) -> Captcha {
        self.captcha
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn update(&mut self, field: ContactField, value: impl Into<String>) {
        self.form.update(field, value);
    }

    pub fn touch(&mut self, field: ContactField) {
        self.form.touch(field);
    }

    /// Error to show next to `field`: only once the visitor has touched it.
    pub fn visible_error(&self, field: ContactField) -> Option<FieldError> {
        if !self.form.field(field).touched {
            return None;
        }
        self.form.error(field, &self.captcha)
    }

    pub fn is_valid(&self) -> bool {
        self.form.is_valid(&self.captcha)
    }

    /// The form became visible: new CAPTCHA, status back to idle.
    pub fn open<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.captcha = Captcha::generate(rng);
        self.status = SubmitStatus::Idle;
    }

    /// Clear everything and draw a new CAPTCHA. An in-flight request keeps
    /// running.
    pub fn close<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.form.reset();
        self.status = SubmitStatus::Idle;
        self.captcha = Captcha::generate(rng);
    }

    /// Validate and, if everything passes, move to `Sending` and hand back the
    /// payload to send. An invalid form only gets all of its fields touched.
    pub fn begin_submit(&mut self, language: Option<Language>) -> Option<ContactPayload> {
        if self.status == SubmitStatus::Sending {
            return None;
        }
        if !self.is_valid() {
            self.form.mark_all_touched();
            return None;
        }
        self.status = SubmitStatus::Sending;
        Some(self.form.payload(language))
    }

    pub fn complete(&mut self, outcome: Result<(), SubmitError>) {
        match outcome {
            Ok(()) => {
                self.status = SubmitStatus::Success;
                self.form.reset();
            }
            Err(err) => {
                tracing::error!(%err, "failed to send contact message");
                self.status = SubmitStatus::Error;
            }
        }
    }
}

/// Mutable access to a [`ContactFlow`] that may live in a `RefCell` or a
/// Dioxus signal. Borrows last only for the closure, never across an await.
pub trait FlowHandle {
    fn with_flow<R>(&mut self, f: impl FnOnce(&mut ContactFlow) -> R) -> R;
}

impl FlowHandle for &RefCell<ContactFlow> {
    fn with_flow<R>(&mut self, f: impl FnOnce(&mut ContactFlow) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

impl FlowHandle for Rc<RefCell<ContactFlow>> {
    fn with_flow<R>(&mut self, f: impl FnOnce(&mut ContactFlow) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

impl FlowHandle for Signal<ContactFlow> {
    fn with_flow<R>(&mut self, f: impl FnOnce(&mut ContactFlow) -> R) -> R {
        self.with_mut(f)
    }
}

/// Run one submission attempt end to end and return the resulting status.
/// No retry; a hung transport leaves the flow in `Sending`.
pub async fn submit<H, T>(mut handle: H, transport: &T, language: Option<Language>) -> SubmitStatus
where
    H: FlowHandle,
    T: ContactTransport + ?Sized,
{
    let Some(payload) = handle.with_flow(|flow| flow.begin_submit(language)) else {
        return handle.with_flow(|flow| flow.status());
    };
    tracing::info!(email = %payload.email, "sending contact message");
    let outcome = transport.send(&payload).await;
    handle.with_flow(|flow| {
        flow.complete(outcome);
        flow.status()
    })
}

/// Start [`submit`] on `spawner` so the attempt is owned by the executor
/// rather than by whichever view started it. Tearing that view down neither
/// cancels the request nor loses its outcome.
pub fn spawn_submit<H, T>(
    spawner: &dyn LocalSpawn,
    handle: H,
    transport: Rc<T>,
    language: Option<Language>,
) -> Result<(), SpawnError>
where
    H: FlowHandle + 'static,
    T: ContactTransport + ?Sized + 'static,
{
    spawner.spawn_local(async move {
        submit(handle, &*transport, language).await;
    })
}
