//! Account Queries
//!
//! Read-only projections: single-account lookup and the activity-filtered
//! listings. Policy checks happen here so every caller gets them.

use std::sync::Arc;

use crate::domain::entity::Account;
use crate::domain::policy::{self, Operation, PolicyDenial, Requester, Target};
use crate::domain::repository::{AccountRepository, ActivityFilter};
use crate::domain::value_object::AccountId;
use crate::error::{AccountsError, AccountsResult};

/// Read-only account queries
pub struct AccountQueries<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> AccountQueries<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    /// Fetch a single account. Customers may only fetch themselves; the
    /// check runs before the lookup so a foreign id yields 403, not 404.
    /// Inactive accounts are not visible through this path.
    pub async fn get(&self, target_id: AccountId, requester: Requester) -> AccountsResult<Account> {
        policy::authorize(
            &requester,
            Operation::ReadOne,
            Some(&Target::id_only(target_id)),
        )?;

        let account = self
            .accounts
            .find_by_id(target_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or(AccountsError::NotFound)?;

        Ok(account)
    }

    /// List accounts by activity state. Owner/Admin only; the inactive
    /// listing is further restricted to Admin.
    pub async fn list(
        &self,
        filter: ActivityFilter,
        requester: Requester,
    ) -> AccountsResult<Vec<Account>> {
        policy::authorize(&requester, Operation::List, None)?;

        if filter == ActivityFilter::Inactive && !requester.role.is_admin() {
            return Err(AccountsError::Forbidden(PolicyDenial::ListRestricted));
        }

        self.accounts.list(filter).await
    }
}
