//! Port for outbound transactional email.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailer adapters.
    pub enum MailerError {
        /// The relay could not be reached.
        Transport { message: String } =>
            "mail relay unreachable: {message}",
        /// The relay refused the message.
        Rejected { status: u16 } =>
            "mail relay rejected message with status {status}",
    }
}

/// Plain-text message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Port for delivering email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email`.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}

/// In-process mailer that records messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct FixtureMailer {
    outbox: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl FixtureMailer {
    /// Messages delivered so far, oldest first.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for FixtureMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| MailerError::transport("fixture outbox poisoned"))?;
        outbox.push(email.clone());
        Ok(())
    }
}
