//! Outbound Mail Delivery
//!
//! SMTP mail sending behind a [`Mailer`] trait so application code can be
//! exercised without a live relay. Delivery failures are surfaced to the
//! caller; nothing here retries.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Recipient or sender address could not be parsed
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    /// Message could not be built
    #[error("Failed to build message: {0}")]
    Build(String),

    /// SMTP transport failure
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mailer contract
///
/// One HTML message per call. Implementations must not block the caller
/// beyond the delivery attempt itself.
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Send an HTML message to a single recipient.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

/// SMTP relay configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname
    pub host: String,
    /// Relay port (465 for implicit TLS, 587 for STARTTLS)
    pub port: u16,
    /// Whether to use implicit TLS (SMTPS) instead of STARTTLS
    pub implicit_tls: bool,
    /// Relay username
    pub username: String,
    /// Relay password
    pub password: String,
    /// Sender, e.g. `"Shop <no-reply@example.com>"`
    pub from: String,
}

/// SMTP-backed mailer
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a pooled transport from the configuration.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from.clone()))?;

        let builder = if config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Delivery(e.to_string()))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let to: Mailbox = to
            .parse()
            .map_err(|_| MailError::InvalidAddress(to.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "SMTP delivery failed");
                Err(MailError::Delivery(e.to_string()))
            }
        }
    }
}
