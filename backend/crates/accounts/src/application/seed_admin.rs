//! Seed Admin Use Case
//!
//! Idempotent bootstrap creation of the admin account. Driven by startup
//! seeding only; the HTTP boundary never reaches this.

use std::sync::Arc;

use platform::password::ClearPassword;

use crate::domain::entity::{Account, NewAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, Phone, Role, Username};
use crate::error::{AccountsError, AccountsResult};

/// Admin seed input
pub struct SeedAdminInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
}

/// Seed admin use case
pub struct SeedAdminUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> SeedAdminUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    /// Create the admin account unless one with this username exists.
    pub async fn execute(&self, input: SeedAdminInput) -> AccountsResult<Account> {
        let username = Username::new(input.username)?;
        let email = Email::new(input.email)?;
        let phone = Phone::new(input.phone)?;

        if self.accounts.find_by_username(username.as_str()).await?.is_some() {
            return Err(AccountsError::AlreadyExists);
        }

        let password_hash = ClearPassword::new(input.password)?.hash()?;

        let account = self
            .accounts
            .insert(NewAccount {
                username,
                password_hash,
                email,
                phone,
                role: Role::Admin,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Admin account seeded");

        Ok(account)
    }
}
