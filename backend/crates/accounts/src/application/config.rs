//! Application Configuration
//!
//! Configuration for the accounts application layer. The token secret lives
//! here and is handed to the [`crate::token::TokenService`] at construction;
//! nothing reads it from globals.

use std::time::Duration;

/// Accounts application configuration
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// HS256 token-signing secret
    pub token_secret: Vec<u8>,
    /// Session token TTL (15 minutes)
    pub session_ttl: Duration,
    /// Restore token TTL (15 minutes)
    pub restore_ttl: Duration,
    /// Frontend base URL for the links embedded in recovery mails
    pub restore_link_base: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            token_secret: vec![0u8; 32],
            session_ttl: Duration::from_secs(15 * 60),
            restore_ttl: Duration::from_secs(15 * 60),
            restore_link_base: "http://localhost:3000".to_string(),
        }
    }
}

impl AccountsConfig {
    /// Create config for development. The secret is fixed and public; never
    /// deploy this.
    pub fn development() -> Self {
        Self {
            token_secret: b"insecure-dev-token-secret-000000".to_vec(),
            ..Default::default()
        }
    }

    /// Link for the account-restoration mail.
    pub fn restore_link(&self, token: &str) -> String {
        format!("{}/restore?token={}", self.restore_link_base, token)
    }

    /// Link for the password-reset mail.
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.restore_link_base, token)
    }
}
