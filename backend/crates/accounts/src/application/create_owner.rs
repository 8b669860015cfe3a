//! Create Owner Use Case
//!
//! Admin-gated creation of Owner accounts. Same creation semantics as
//! registration, minus the customer profile.

use std::sync::Arc;

use platform::password::ClearPassword;

use crate::domain::entity::{Account, NewAccount};
use crate::domain::policy::{self, Operation, Requester};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, Phone, Role, Username};
use crate::error::{AccountsError, AccountsResult};

/// Owner creation input
pub struct CreateOwnerInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
}

/// Create owner use case
pub struct CreateOwnerUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> CreateOwnerUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    pub async fn execute(
        &self,
        input: CreateOwnerInput,
        requester: Requester,
    ) -> AccountsResult<Account> {
        policy::authorize(&requester, Operation::CreateOwner, None)?;

        let username = Username::new(input.username)?;
        let email = Email::new(input.email)?;
        let phone = Phone::new(input.phone)?;

        if self.accounts.find_by_username(username.as_str()).await?.is_some() {
            return Err(AccountsError::DuplicateUsername);
        }
        if self.accounts.find_by_email(email.as_str()).await?.is_some() {
            return Err(AccountsError::DuplicateEmail);
        }

        let password_hash = ClearPassword::new(input.password)?.hash()?;

        let account = self
            .accounts
            .insert(NewAccount {
                username,
                password_hash,
                email,
                phone,
                role: Role::Owner,
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            created_by = %requester.id,
            "Owner account created"
        );

        Ok(account)
    }
}
