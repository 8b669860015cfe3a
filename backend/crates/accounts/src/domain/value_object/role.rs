use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role.
///
/// Single canonical vocabulary; historical `USER`/`CLIENT` spellings from
/// earlier revisions are the same concept as `Customer` and are not
/// representable. Ordering encodes the hierarchy: Admin > Owner > Customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    #[default]
    Customer = 0,
    Owner = 1,
    Admin = 2,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Customer => "customer",
            Owner => "owner",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    #[inline]
    pub const fn is_owner_or_higher(&self) -> bool {
        use Role::*;
        matches!(self, Owner | Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use Role::*;
        match id {
            0 => Some(Customer),
            1 => Some(Owner),
            2 => Some(Admin),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "customer" => Some(Customer),
            "owner" => Some(Owner),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
