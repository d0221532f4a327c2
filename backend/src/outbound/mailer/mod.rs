//! Mail outbound adapters.
//!
//! [`HttpMailer`] posts each message as JSON to a transactional mail relay.
//! [`LogMailer`] only records that a message would have been sent and is
//! used when no relay is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{Mailer, MailerError, OutgoingEmail};

/// JSON body accepted by the relay.
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Relay-backed mailer.
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
    from: String,
}

impl HttpMailer {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            api_key: api_key.map(Zeroizing::new),
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let body = RelayMessage {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };
        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|error| MailerError::transport(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "mail relay rejected message");
            return Err(MailerError::rejected(status.as_u16()));
        }
        info!(subject = %email.subject, "email handed to relay");
        Ok(())
    }
}

/// Mailer that writes a log line instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        // Never log the body: reset mails carry a live token.
        info!(to = %email.to, subject = %email.subject, "mail relay not configured; email dropped");
        Ok(())
    }
}
