//! Username Value Object
//!
//! Registration-time username validation. Login deliberately bypasses this
//! type and looks accounts up by the raw trimmed string, because accounts
//! created under older, looser rules must still be able to sign in.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum username length at registration
const USERNAME_MIN_LENGTH: usize = 4;

/// Maximum username length at registration
const USERNAME_MAX_LENGTH: usize = 10;

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new username with registration validation.
    ///
    /// Trims surrounding whitespace, then requires 4 to 10 characters.
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let trimmed = raw.into().trim().to_string();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("Username cannot be empty"));
        }

        let char_count = trimmed.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&char_count) {
            return Err(AppError::bad_request(format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
            )));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::bad_request("Username cannot contain whitespace"));
        }

        Ok(Self(trimmed))
    }

    /// Wrap a value loaded from the database without re-validating.
    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Username {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Username::new(s)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
