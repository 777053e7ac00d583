//! Outbound delivery of contact messages.

use futures::future::LocalBoxFuture;

use super::config::AppConfig;
use super::contact::ContactPayload;

/// Any failure to hand the message to the backend. Transient and permanent
/// failures are not told apart.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("contact request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("contact endpoint answered with status {0}")]
    Status(u16),
}

pub trait ContactTransport {
    fn send<'a>(&'a self, payload: &'a ContactPayload)
        -> LocalBoxFuture<'a, Result<(), SubmitError>>;
}

/// `POST`s the payload as JSON; any 2xx counts as delivered and the body is
/// ignored.
#[derive(Debug, Clone)]
pub struct HttpContactTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpContactTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.contact_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ContactTransport for HttpContactTransport {
    fn send<'a>(
        &'a self,
        payload: &'a ContactPayload,
    ) -> LocalBoxFuture<'a, Result<(), SubmitError>> {
        Box::pin(async move {
            let response = self.client.post(&self.url).json(payload).send().await?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(SubmitError::Status(status.as_u16()))
            }
        })
    }
}
