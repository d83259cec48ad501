//! E-mail delivery through Resend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::DeliveryConfig;

pub const RESEND_BASE_URL: &str = "https://api.resend.com";
pub const DIGEST_SENDER: &str = "Daily Rundown <digest@updates.attrove.com>";

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Resend returned {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A plain-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl Envelope {
    /// The daily digest addressed to `to`.
    pub fn digest(to: &str, subject: &str, text: &str) -> Self {
        Self {
            from: DIGEST_SENDER.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the envelope, returning the provider's message id when given.
    async fn send(&self, envelope: &Envelope) -> Result<Option<String>, DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct ResendMailer {
    http: reqwest::Client,
    endpoint: url::Url,
    api_key: String,
}

impl ResendMailer {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        Self::with_base_url(&config.api_key, RESEND_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, DeliveryError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: url::Url::parse(base_url)?.join("/emails")?,
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResendErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, envelope: &Envelope) -> Result<Option<String>, DeliveryError> {
        log::debug!("sending \"{}\" to {}", envelope.subject, envelope.to);
        let resp = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(envelope)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let parsed: ResendErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message: parsed
                    .message
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body).unwrap_or_default();
        Ok(parsed.id)
    }
}
