//! Value Objects

pub mod account_id;
pub mod email;
pub mod phone;
pub mod role;
pub mod username;

pub use account_id::{AccountId, ProfileId};
pub use email::Email;
pub use phone::Phone;
pub use role::Role;
pub use username::Username;
