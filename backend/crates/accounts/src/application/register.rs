//! Register Use Case
//!
//! Creates a Customer account together with its customer profile. The two
//! rows are one logical unit; the store persists them in a single
//! transaction so a crash cannot leave an account without its profile.

use std::sync::Arc;

use platform::password::ClearPassword;

use crate::domain::entity::customer_profile::{
    ADDRESS_MAX_LENGTH, CITY_MAX_LENGTH, LOCATION_MAX_LENGTH,
};
use crate::domain::entity::{Account, CustomerProfile, NewAccount, NewProfile};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, Phone, Role, Username};
use crate::error::{AccountsError, AccountsResult};

/// Registration input
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub location: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    pub async fn execute(
        &self,
        input: RegisterInput,
    ) -> AccountsResult<(Account, CustomerProfile)> {
        let username = Username::new(input.username)?;
        let email = Email::new(input.email)?;
        let phone = Phone::new(input.phone)?;
        let profile = validate_profile(input.address, input.city, input.location)?;

        // Pre-checks give the common case a clean error before any hashing
        // work; the store's unique constraints remain the authority under
        // concurrent registration.
        if self.accounts.find_by_username(username.as_str()).await?.is_some() {
            return Err(AccountsError::DuplicateUsername);
        }
        if self.accounts.find_by_email(email.as_str()).await?.is_some() {
            return Err(AccountsError::DuplicateEmail);
        }

        let password_hash = ClearPassword::new(input.password)?.hash()?;

        let account = NewAccount {
            username,
            password_hash,
            email,
            phone,
            role: Role::Customer,
        };

        let (account, profile) = self.accounts.insert_with_profile(account, profile).await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Customer registered"
        );

        Ok((account, profile))
    }
}

/// Validate the profile fields shared by registration.
pub(crate) fn validate_profile(
    address: String,
    city: String,
    location: Option<String>,
) -> AccountsResult<NewProfile> {
    let address = address.trim().to_string();
    let city = city.trim().to_string();
    let location = location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    if address.is_empty() || address.len() > ADDRESS_MAX_LENGTH {
        return Err(AccountsError::invalid_input(format!(
            "Address must be between 1 and {} characters",
            ADDRESS_MAX_LENGTH
        )));
    }
    if city.is_empty() || city.len() > CITY_MAX_LENGTH {
        return Err(AccountsError::invalid_input(format!(
            "City must be between 1 and {} characters",
            CITY_MAX_LENGTH
        )));
    }
    if let Some(location) = &location {
        if location.len() > LOCATION_MAX_LENGTH {
            return Err(AccountsError::invalid_input(format!(
                "Location must be at most {} characters",
                LOCATION_MAX_LENGTH
            )));
        }
    }

    Ok(NewProfile {
        address,
        city,
        location,
    })
}
