//! Customer Profile Entity
//!
//! Address/contact extension owned exclusively by a Customer-role account.
//! Created in the same transaction as the account; soft-deactivation leaves
//! it in place.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{AccountId, ProfileId};

/// Maximum address length
pub const ADDRESS_MAX_LENGTH: usize = 100;

/// Maximum city length
pub const CITY_MAX_LENGTH: usize = 50;

/// Maximum location length
pub const LOCATION_MAX_LENGTH: usize = 50;

/// Customer profile entity
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub id: ProfileId,
    /// Owning account; exactly one profile per Customer account
    pub account_id: AccountId,
    pub address: String,
    pub city: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields for an account being registered.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub address: String,
    pub city: String,
    pub location: Option<String>,
}

impl CustomerProfile {
    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn set_address(&mut self, address: String) {
        self.address = address;
        self.touch();
    }

    pub fn set_city(&mut self, city: String) {
        self.city = city;
        self.touch();
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
        self.touch();
    }
}
