//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer and must enforce username/email uniqueness at the
//! storage level, surfacing conflicts as `DuplicateUsername` /
//! `DuplicateEmail` so check-then-write races cannot slip through.

use crate::domain::entity::{Account, CustomerProfile, NewAccount, NewProfile};
use crate::domain::value_object::AccountId;
use crate::error::AccountsResult;

/// Activity filter for listing accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityFilter {
    All,
    Active,
    Inactive,
}

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; the store assigns id and timestamps.
    async fn insert(&self, account: NewAccount) -> AccountsResult<Account>;

    /// Insert a new account plus its customer profile as one atomic unit.
    async fn insert_with_profile(
        &self,
        account: NewAccount,
        profile: NewProfile,
    ) -> AccountsResult<(Account, CustomerProfile)>;

    /// Find an account by id, regardless of activity state.
    async fn find_by_id(&self, id: AccountId) -> AccountsResult<Option<Account>>;

    /// Find an account by username, regardless of activity state.
    async fn find_by_username(&self, username: &str) -> AccountsResult<Option<Account>>;

    /// Find an active account by username (sign-in path).
    async fn find_active_by_username(&self, username: &str) -> AccountsResult<Option<Account>>;

    /// Find an account by email, regardless of activity state.
    async fn find_by_email(&self, email: &str) -> AccountsResult<Option<Account>>;

    /// Persist mutated account fields.
    async fn update(&self, account: &Account) -> AccountsResult<()>;

    /// Mark an account inactive. Returns whether the row existed.
    /// Deliberately unconditional: deactivating an inactive account is fine.
    async fn set_inactive(&self, id: AccountId) -> AccountsResult<bool>;

    /// Mark an account active, only if it is currently inactive.
    /// Returns whether the state actually flipped.
    async fn activate(&self, id: AccountId) -> AccountsResult<bool>;

    /// List accounts by activity state, ordered by id.
    async fn list(&self, filter: ActivityFilter) -> AccountsResult<Vec<Account>>;
}

/// Customer profile repository trait
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Find the profile owned by an account.
    async fn find_by_account_id(
        &self,
        account_id: AccountId,
    ) -> AccountsResult<Option<CustomerProfile>>;

    /// Persist mutated profile fields.
    async fn update(&self, profile: &CustomerProfile) -> AccountsResult<()>;
}
