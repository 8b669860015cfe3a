//! Deactivate Use Case
//!
//! Soft-deactivation. The target is loaded first so the policy can see its
//! role; rule 1 makes Admin accounts untouchable by everyone.
//!
//! Deactivating an already-inactive account succeeds without error. That
//! asymmetry with restoration (which rejects double-restore) is deliberate
//! and pinned by tests.

use std::sync::Arc;

use crate::domain::policy::{self, Operation, Requester, Target};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::AccountId;
use crate::error::{AccountsError, AccountsResult};

/// Deactivate use case
pub struct DeactivateUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> DeactivateUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, target_id: AccountId, requester: Requester) -> AccountsResult<()> {
        let account = self
            .accounts
            .find_by_id(target_id)
            .await?
            .ok_or(AccountsError::NotFound)?;

        policy::authorize(
            &requester,
            Operation::Deactivate,
            Some(&Target::with_role(account.id, account.role)),
        )?;

        self.accounts.set_inactive(account.id).await?;

        tracing::info!(
            account_id = %account.id,
            deactivated_by = %requester.id,
            "Account deactivated"
        );

        Ok(())
    }
}
