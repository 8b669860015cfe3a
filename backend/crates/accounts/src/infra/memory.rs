//! In-Memory Store Implementation
//!
//! Implements the repository traits over locked maps. Used by the test
//! suites and for running the API without a database; it mirrors the
//! Postgres store's behavior, including unique-constraint conflicts and the
//! conditional activate write.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::{Account, CustomerProfile, NewAccount, NewProfile};
use crate::domain::repository::{AccountRepository, ActivityFilter, ProfileRepository};
use crate::domain::value_object::{AccountId, ProfileId};
use crate::error::{AccountsError, AccountsResult};

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<i64, Account>,
    profiles: BTreeMap<i64, CustomerProfile>,
    next_account_id: i64,
    next_profile_id: i64,
}

impl Inner {
    fn next_account_id(&mut self) -> i64 {
        self.next_account_id += 1;
        self.next_account_id
    }

    fn next_profile_id(&mut self) -> i64 {
        self.next_profile_id += 1;
        self.next_profile_id
    }

    /// The moral equivalent of the schema's UNIQUE constraints.
    fn check_unique(&self, account: &NewAccount) -> AccountsResult<()> {
        for existing in self.accounts.values() {
            if existing.username.as_str() == account.username.as_str() {
                return Err(AccountsError::DuplicateUsername);
            }
            if existing.email.as_str() == account.email.as_str() {
                return Err(AccountsError::DuplicateEmail);
            }
        }
        Ok(())
    }

    fn insert_account(&mut self, account: NewAccount) -> AccountsResult<Account> {
        self.check_unique(&account)?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::from_i64(self.next_account_id()),
            username: account.username,
            password_hash: account.password_hash,
            email: account.email,
            phone: account.phone,
            is_active: true,
            role: account.role,
            created_at: now,
            updated_at: now,
        };

        self.accounts.insert(account.id.as_i64(), account.clone());
        Ok(account)
    }
}

/// In-memory account store
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for MemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> AccountsResult<Account> {
        let mut inner = self.inner.write().await;
        inner.insert_account(account)
    }

    async fn insert_with_profile(
        &self,
        account: NewAccount,
        profile: NewProfile,
    ) -> AccountsResult<(Account, CustomerProfile)> {
        // Single lock scope stands in for the database transaction.
        let mut inner = self.inner.write().await;

        let account = inner.insert_account(account)?;

        let now = Utc::now();
        let profile = CustomerProfile {
            id: ProfileId::from_i64(inner.next_profile_id()),
            account_id: account.id,
            address: profile.address,
            city: profile.city,
            location: profile.location,
            created_at: now,
            updated_at: now,
        };
        inner.profiles.insert(profile.id.as_i64(), profile.clone());

        Ok((account, profile))
    }

    async fn find_by_id(&self, id: AccountId) -> AccountsResult<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(&id.as_i64()).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AccountsResult<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|a| a.username.as_str() == username)
            .cloned())
    }

    async fn find_active_by_username(&self, username: &str) -> AccountsResult<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|a| a.is_active && a.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AccountsResult<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|a| a.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, account: &Account) -> AccountsResult<()> {
        let mut inner = self.inner.write().await;

        for existing in inner.accounts.values() {
            if existing.id == account.id {
                continue;
            }
            if existing.username.as_str() == account.username.as_str() {
                return Err(AccountsError::DuplicateUsername);
            }
            if existing.email.as_str() == account.email.as_str() {
                return Err(AccountsError::DuplicateEmail);
            }
        }

        if !inner.accounts.contains_key(&account.id.as_i64()) {
            return Err(AccountsError::NotFound);
        }

        inner.accounts.insert(account.id.as_i64(), account.clone());
        Ok(())
    }

    async fn set_inactive(&self, id: AccountId) -> AccountsResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(&id.as_i64()) {
            Some(account) => {
                account.is_active = false;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn activate(&self, id: AccountId) -> AccountsResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(&id.as_i64()) {
            Some(account) if !account.is_active => {
                account.is_active = true;
                account.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self, filter: ActivityFilter) -> AccountsResult<Vec<Account>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .filter(|a| match filter {
                ActivityFilter::All => true,
                ActivityFilter::Active => a.is_active,
                ActivityFilter::Inactive => !a.is_active,
            })
            .cloned()
            .collect())
    }
}

impl ProfileRepository for MemoryAccountStore {
    async fn find_by_account_id(
        &self,
        account_id: AccountId,
    ) -> AccountsResult<Option<CustomerProfile>> {
        let inner = self.inner.read().await;
        Ok(inner
            .profiles
            .values()
            .find(|p| p.account_id == account_id)
            .cloned())
    }

    async fn update(&self, profile: &CustomerProfile) -> AccountsResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.profiles.contains_key(&profile.id.as_i64()) {
            return Err(AccountsError::NotFound);
        }
        inner.profiles.insert(profile.id.as_i64(), profile.clone());
        Ok(())
    }
}
