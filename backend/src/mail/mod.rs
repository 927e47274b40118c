//! Outbound mail. The relay is an external collaborator behind the
//! `MailRelay` trait; the production implementation speaks authenticated
//! SMTP with STARTTLS.
//!
//! Delivery to a recipient list is an explicit iteration with independent
//! per-recipient outcomes: one rejected address never stops the rest, and the
//! summary reports every attempt. No retry, no batch atomicity — relay-accepted
//! is the only confirmation available.

use common::requests::{NotifySummary, RecipientOutcome};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::warn;
use regex::Regex;
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address `{0}`")]
    Address(String),
    #[error("message could not be built: {0}")]
    Message(String),
    #[error("smtp transport error: {0}")]
    Transport(String),
}

pub trait MailRelay: Send + Sync {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

pub struct SmtpRelay {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpRelay {
    pub fn connect(config: &MailConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| MailError::Address(config.from.clone()))?;
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(SmtpRelay { transport, from })
    }
}

impl MailRelay for SmtpRelay {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let to: Mailbox = to.parse().map_err(|_| MailError::Address(to.to_string()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Message(e.to_string()))?;
        self.transport
            .send(&message)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Splits the comma-separated recipient list, trims each entry and sends one
/// message per recipient, collecting an outcome per attempt.
pub fn deliver_to_all(
    relay: &dyn MailRelay,
    recipients: &str,
    subject: &str,
    html_body: &str,
) -> NotifySummary {
    let address_shape = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok();
    let mut outcomes = Vec::new();

    for entry in recipients.split(',') {
        let recipient = entry.trim();
        if recipient.is_empty() {
            continue;
        }
        if let Some(re) = &address_shape {
            if !re.is_match(recipient) {
                warn!("skipping malformed recipient `{recipient}`");
                outcomes.push(RecipientOutcome {
                    recipient: recipient.to_string(),
                    accepted: false,
                    error: Some("malformed email address".to_string()),
                });
                continue;
            }
        }
        match relay.send(recipient, subject, html_body) {
            Ok(()) => outcomes.push(RecipientOutcome {
                recipient: recipient.to_string(),
                accepted: true,
                error: None,
            }),
            Err(e) => {
                warn!("delivery to {recipient} failed: {e}");
                outcomes.push(RecipientOutcome {
                    recipient: recipient.to_string(),
                    accepted: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    NotifySummary::from_outcomes(outcomes)
}
