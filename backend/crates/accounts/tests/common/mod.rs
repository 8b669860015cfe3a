//! Shared test fixtures: mailers and account builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use accounts::application::{RegisterInput, RegisterUseCase, SeedAdminInput, SeedAdminUseCase};
use accounts::models::Account;
use accounts::{AccountsConfig, MemoryAccountStore};
use platform::mail::{MailError, Mailer};

/// A recorded outbound message.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records messages instead of delivering them.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> SentMail {
        self.sent.lock().unwrap().last().cloned().expect("no mail sent")
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

/// Mailer whose relay is always down.
#[derive(Clone, Default)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), MailError> {
        Err(MailError::Delivery("connection refused".to_string()))
    }
}

/// Pull the token out of a recovery mail body (`...token=<token>"...`).
pub fn token_from_mail(body: &str) -> String {
    body.split("token=")
        .nth(1)
        .expect("mail body carries no token")
        .split('"')
        .next()
        .unwrap()
        .to_string()
}

/// Config with a fixed secret so tests can mint their own tokens.
pub fn test_config() -> AccountsConfig {
    AccountsConfig {
        token_secret: b"accounts-test-secret".to_vec(),
        ..AccountsConfig::development()
    }
}

/// Register a customer with derived email/phone, e.g. `customer("mario")`.
pub async fn register_customer(store: &Arc<MemoryAccountStore>, username: &str) -> Account {
    let use_case = RegisterUseCase::new(store.clone());
    let (account, _profile) = use_case
        .execute(RegisterInput {
            username: username.to_string(),
            password: format!("{username}-password-1"),
            email: format!("{username}@example.com"),
            phone: "1144445555".to_string(),
            address: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            location: None,
        })
        .await
        .expect("registration failed");
    account
}

/// Seed the bootstrap admin.
pub async fn seed_admin(store: &Arc<MemoryAccountStore>) -> Account {
    SeedAdminUseCase::new(store.clone())
        .execute(SeedAdminInput {
            username: "admin".to_string(),
            password: "admin-password-1".to_string(),
            email: "admin@example.com".to_string(),
            phone: "1100000000".to_string(),
        })
        .await
        .expect("admin seed failed")
}
