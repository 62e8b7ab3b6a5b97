//! Outbound mail for the agora platform.
//!
//! Mail is always best-effort: a failed send is reported to the caller as a
//! [`MailError`] but must never roll back the write that triggered it.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),

    #[error("mail provider rejected the message: HTTP {0}")]
    Rejected(u16),
}

/// One outbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: Option<String>,
    pub body: String,
}

/// Mail delivery interface.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Mailgun HTTP delivery.
pub struct MailgunMailer {
    client: reqwest::Client,
    /// Messages endpoint, e.g. `https://api.mailgun.net/v3/<domain>/messages`.
    endpoint: String,
    api_key: String,
}

impl MailgunMailer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let form = [
            ("from", message.from.as_str()),
            ("to", message.to.as_str()),
            ("subject", message.subject.as_deref().unwrap_or("")),
            ("text", message.body.as_str()),
        ];
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), to = %message.to, "mail rejected");
            return Err(MailError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Captures messages instead of sending them; optionally fails every send.
pub struct NullMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    fail: bool,
}

impl NullMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A mailer whose every send fails, for exercising best-effort paths.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for NullMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("null mailer set to fail".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
