//! Account Entity
//!
//! Core identity record. The password hash lives here because the store is
//! the only other place that sees it; responses are built from
//! [`crate::presentation::dto`] projections that never carry it.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{AccountId, Email, Phone, Role, Username};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Store-assigned id, immutable
    pub id: AccountId,
    /// Unique login name
    pub username: Username,
    /// Argon2id PHC string; plaintext is never stored
    pub password_hash: HashedPassword,
    /// Unique contact address
    pub email: Email,
    /// Digits-only contact number
    pub phone: Phone,
    /// False = soft-deactivated
    pub is_active: bool,
    /// Role (Customer, Owner, Admin)
    pub role: Role,
    /// Created timestamp, immutable
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields for an account that does not exist yet; the store assigns the id
/// and the timestamps.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub password_hash: HashedPassword,
    pub email: Email,
    pub phone: Phone,
    pub role: Role,
}

impl Account {
    /// Touch the updated timestamp; called by every mutator.
    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn set_phone(&mut self, phone: Phone) {
        self.phone = phone;
        self.touch();
    }

    pub fn set_password_hash(&mut self, hash: HashedPassword) {
        self.password_hash = hash;
        self.touch();
    }
}
