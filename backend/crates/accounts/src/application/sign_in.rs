//! Sign In Use Case
//!
//! Verifies credentials and issues a session token. Unknown usernames and
//! wrong passwords fail with the same error so the endpoint cannot be used
//! to enumerate accounts.

use std::sync::Arc;

use crate::domain::repository::AccountRepository;
use crate::domain::value_object::Role;
use crate::error::{AccountsError, AccountsResult};
use crate::token::TokenService;

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output; everything a client may see. Never the hash.
#[derive(Debug)]
pub struct SignInOutput {
    pub access_token: String,
    pub username: String,
    pub role: Role,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountsResult<SignInOutput> {
        // Login accepts any non-empty username, including legacy names the
        // current registration rules would reject.
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AccountsError::invalid_input("Username is required"));
        }
        if input.password.is_empty() {
            return Err(AccountsError::invalid_input("Password is required"));
        }

        let account = self
            .accounts
            .find_active_by_username(username)
            .await?
            .ok_or(AccountsError::InvalidCredentials)?;

        if !account.password_hash.verify_raw(&input.password) {
            return Err(AccountsError::InvalidCredentials);
        }

        let access_token = self.tokens.issue_session(&account)?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "User signed in"
        );

        Ok(SignInOutput {
            access_token,
            username: account.username.as_str().to_string(),
            role: account.role,
        })
    }
}
