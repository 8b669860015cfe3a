//! Restore Account Use Case
//!
//! Reactivates a soft-deactivated account. The restore token itself is the
//! authorization proof; there is no role check on this path.

use std::sync::Arc;

use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::error::{AccountsError, AccountsResult};
use crate::token::TokenService;

use super::recovery::consume_restore_token;

/// Restore account use case
pub struct RestoreAccountUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> RestoreAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    /// Consume a restore token and reactivate its subject.
    pub async fn execute(&self, token: &str) -> AccountsResult<Account> {
        let subject = consume_restore_token(&self.tokens, token)?;

        let account = self
            .accounts
            .find_by_id(subject)
            .await?
            .ok_or(AccountsError::NotFound)?;

        if account.is_active {
            return Err(AccountsError::AlreadyActive);
        }

        // Conditional write; a concurrent restore loses cleanly.
        if !self.accounts.activate(account.id).await? {
            return Err(AccountsError::AlreadyActive);
        }

        tracing::info!(account_id = %account.id, "Account restored");

        // Reflect the flip without a reload.
        let mut account = account;
        account.is_active = true;
        Ok(account)
    }
}
