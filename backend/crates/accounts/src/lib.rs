//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, authorization policy, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Store implementations (Postgres, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Customer registration with a linked customer profile
//! - Bearer-token sign-in (short-lived HS256 session tokens)
//! - Role hierarchy (Customer, Owner, Admin) behind a pure decision table
//! - Soft deactivation / restoration of accounts
//! - Signed-token password reset and account restoration over mail
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Session and restore tokens share one signing secret but carry a
//!   purpose discriminator; neither is accepted in the other's place
//! - Unknown user and wrong password are indistinguishable on sign-in
//! - Admin accounts can never be deactivated, by anyone

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use error::{AccountsError, AccountsResult};
pub use infra::memory::MemoryAccountStore;
pub use infra::postgres::PgAccountStore;
pub use presentation::router::{api_router, auth_router, users_router};
pub use token::{TokenService, TokenPurpose};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
