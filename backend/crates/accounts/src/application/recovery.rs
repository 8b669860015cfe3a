//! Recovery Request Use Cases
//!
//! The two mail-sending flows, plus the shared restore-token consumption
//! step used by their counterparts.
//!
//! Both requests issue the same kind of restore token; they differ only in
//! which accounts they accept:
//! - account restoration is for DEACTIVATED accounts,
//! - password reset is for ACTIVE accounts.
//!
//! A mail failure aborts the request, but the token that was already issued
//! stays valid until its natural expiry; there is no revocation.

use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::config::AccountsConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, Email};
use crate::error::{AccountsError, AccountsResult};
use crate::token::{TokenPurpose, TokenService};

/// Verify a restore token and yield its subject id.
///
/// Shared by the reset-password and restore-account flows. Signature/expiry
/// problems surface as token errors; a session token lands here as
/// [`AccountsError::WrongTokenPurpose`].
pub fn consume_restore_token(tokens: &TokenService, token: &str) -> AccountsResult<AccountId> {
    let claims = tokens.verify(token)?;

    if claims.purpose() != Some(TokenPurpose::Restore) {
        return Err(AccountsError::WrongTokenPurpose);
    }

    Ok(claims.subject())
}

/// Request an account-restoration mail.
pub struct RequestRestoreUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    accounts: Arc<R>,
    mailer: Arc<M>,
    tokens: Arc<TokenService>,
    config: Arc<AccountsConfig>,
}

impl<R, M> RequestRestoreUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    pub fn new(
        accounts: Arc<R>,
        mailer: Arc<M>,
        tokens: Arc<TokenService>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            accounts,
            mailer,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AccountsResult<()> {
        let email = Email::new(email)?;

        // Restoration only applies to deactivated accounts.
        let account = self
            .accounts
            .find_by_email(email.as_str())
            .await?
            .filter(|a| !a.is_active)
            .ok_or(AccountsError::NotFound)?;

        let token = self.tokens.issue_restore(account.id)?;
        let link = self.config.restore_link(&token);

        self.mailer
            .send(
                account.email.as_str(),
                "Account restoration",
                &restore_body(&link),
            )
            .await?;

        tracing::info!(account_id = %account.id, "Restore mail sent");

        Ok(())
    }
}

/// Request a password-reset mail.
pub struct RequestPasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    accounts: Arc<R>,
    mailer: Arc<M>,
    tokens: Arc<TokenService>,
    config: Arc<AccountsConfig>,
}

impl<R, M> RequestPasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    pub fn new(
        accounts: Arc<R>,
        mailer: Arc<M>,
        tokens: Arc<TokenService>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            accounts,
            mailer,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AccountsResult<()> {
        let email = Email::new(email)?;

        // Reset is the conventional path: active accounts only.
        let account = self
            .accounts
            .find_by_email(email.as_str())
            .await?
            .filter(|a| a.is_active)
            .ok_or(AccountsError::NotFound)?;

        let token = self.tokens.issue_restore(account.id)?;
        let link = self.config.reset_link(&token);

        self.mailer
            .send(account.email.as_str(), "Password reset", &reset_body(&link))
            .await?;

        tracing::info!(account_id = %account.id, "Password reset mail sent");

        Ok(())
    }
}

fn restore_body(link: &str) -> String {
    format!(
        "<h3>Account recovery</h3>\
         <p>Click the link below to restore your account:</p>\
         <a href=\"{link}\">{link}</a>"
    )
}

fn reset_body(link: &str) -> String {
    format!(
        "<h3>Reset your password</h3>\
         <p>Click the link below to choose a new password:</p>\
         <a href=\"{link}\">{link}</a>"
    )
}
