//! Reset Password Use Case
//!
//! Consumes a restore token and replaces the account's password hash.
//! Only active accounts can complete a reset; a deactivated account must be
//! restored first.

use std::sync::Arc;

use platform::password::ClearPassword;

use crate::domain::repository::AccountRepository;
use crate::error::{AccountsError, AccountsResult};
use crate::token::TokenService;

use super::recovery::consume_restore_token;

/// Reset password use case
pub struct ResetPasswordUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    pub async fn execute(&self, token: &str, new_password: String) -> AccountsResult<()> {
        // Validate the password before touching the token so the caller
        // gets a 400 for a bad password even with a stale link.
        let password = ClearPassword::new(new_password)?;

        let subject = consume_restore_token(&self.tokens, token)?;

        let mut account = self
            .accounts
            .find_by_id(subject)
            .await?
            .filter(|a| a.is_active)
            .ok_or(AccountsError::NotFound)?;

        account.set_password_hash(password.hash()?);
        self.accounts.update(&account).await?;

        tracing::info!(account_id = %account.id, "Password reset");

        Ok(())
    }
}
