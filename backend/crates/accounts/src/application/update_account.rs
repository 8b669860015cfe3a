//! Update Account Use Case
//!
//! Partial updates over an account and, for Customer targets, its profile.
//! Customers may only update themselves and only a narrowed field set:
//! email, phone, password, address, city, location. Role, username,
//! activity state and id are immutable from that path.

use std::sync::Arc;

use platform::password::ClearPassword;

use crate::domain::entity::Account;
use crate::domain::policy::{self, Operation, Requester, Target};
use crate::domain::repository::{AccountRepository, ProfileRepository};
use crate::domain::value_object::{AccountId, Email, Phone, Role, Username};
use crate::error::{AccountsError, AccountsResult};

use super::register::validate_profile;

/// Partial update input; `None` fields are left untouched.
#[derive(Default)]
pub struct UpdateAccountInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
}

/// Update account use case
pub struct UpdateAccountUseCase<R, P>
where
    R: AccountRepository,
    P: ProfileRepository,
{
    accounts: Arc<R>,
    profiles: Arc<P>,
}

impl<R, P> UpdateAccountUseCase<R, P>
where
    R: AccountRepository,
    P: ProfileRepository,
{
    pub fn new(accounts: Arc<R>, profiles: Arc<P>) -> Self {
        Self { accounts, profiles }
    }

    pub async fn execute(
        &self,
        target_id: AccountId,
        mut input: UpdateAccountInput,
        requester: Requester,
    ) -> AccountsResult<Account> {
        // Policy first: a foreign target must 403 before any lookup.
        policy::authorize(
            &requester,
            Operation::Update,
            Some(&Target::id_only(target_id)),
        )?;

        // Field narrowing for customer self-updates: the username field is
        // dropped, not rejected, so a payload that also carries permitted
        // fields still applies them.
        if requester.role == Role::Customer {
            input.username = None;
        }

        let mut account = self
            .accounts
            .find_by_id(target_id)
            .await?
            .ok_or(AccountsError::NotFound)?;

        // Profile fields only mean something on a Customer target.
        let wants_profile_change = account.role == Role::Customer
            && (input.address.is_some() || input.city.is_some() || input.location.is_some());

        let wants_account_change = input.username.is_some()
            || input.email.is_some()
            || input.phone.is_some()
            || input.password.is_some();

        if !wants_account_change && !wants_profile_change {
            return Err(AccountsError::NoUpdatableFields);
        }

        if let Some(raw) = input.username {
            let username = Username::new(raw)?;
            if let Some(existing) = self.accounts.find_by_username(username.as_str()).await? {
                if existing.id != account.id {
                    return Err(AccountsError::DuplicateUsername);
                }
            }
            account.set_username(username);
        }

        if let Some(raw) = input.email {
            let email = Email::new(raw)?;
            if let Some(existing) = self.accounts.find_by_email(email.as_str()).await? {
                if existing.id != account.id {
                    return Err(AccountsError::DuplicateEmail);
                }
            }
            account.set_email(email);
        }

        if let Some(raw) = input.phone {
            account.set_phone(Phone::new(raw)?);
        }

        if let Some(raw) = input.password {
            let hash = ClearPassword::new(raw)?.hash()?;
            account.set_password_hash(hash);
        }

        if wants_account_change {
            self.accounts.update(&account).await?;
        }

        if wants_profile_change {
            let mut profile = self
                .profiles
                .find_by_account_id(account.id)
                .await?
                .ok_or_else(|| {
                    // A customer account without a profile violates the
                    // one-to-one invariant; surface it, don't paper over it.
                    AccountsError::Internal(format!(
                        "Customer account {} has no profile",
                        account.id
                    ))
                })?;

            // Reuse the registration validation for the changed fields.
            let merged = validate_profile(
                input.address.unwrap_or_else(|| profile.address.clone()),
                input.city.unwrap_or_else(|| profile.city.clone()),
                input.location.or_else(|| profile.location.clone()),
            )?;

            profile.set_address(merged.address);
            profile.set_city(merged.city);
            profile.set_location(merged.location);

            self.profiles.update(&profile).await?;
        }

        tracing::info!(
            account_id = %account.id,
            updated_by = %requester.id,
            "Account updated"
        );

        Ok(account)
    }
}
