//! Phone Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

/// Digits-only phone number, 10 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let phone = raw.into().trim().to_string();

        if !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request("Phone must contain only digits"));
        }

        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&phone.len()) {
            return Err(AppError::bad_request(format!(
                "Phone must be between {} and {} digits",
                PHONE_MIN_DIGITS, PHONE_MAX_DIGITS
            )));
        }

        Ok(Self(phone))
    }

    /// Wrap a value loaded from the database without re-validating.
    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Phone {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Phone::new(s)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
