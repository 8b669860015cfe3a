//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_owner;
pub mod deactivate;
pub mod queries;
pub mod recovery;
pub mod register;
pub mod reset_password;
pub mod restore;
pub mod seed_admin;
pub mod sign_in;
pub mod update_account;

// Re-exports
pub use config::AccountsConfig;
pub use create_owner::{CreateOwnerInput, CreateOwnerUseCase};
pub use deactivate::DeactivateUseCase;
pub use queries::AccountQueries;
pub use recovery::{RequestPasswordResetUseCase, RequestRestoreUseCase, consume_restore_token};
pub use register::{RegisterInput, RegisterUseCase};
pub use reset_password::ResetPasswordUseCase;
pub use restore::RestoreAccountUseCase;
pub use seed_admin::{SeedAdminInput, SeedAdminUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use update_account::{UpdateAccountInput, UpdateAccountUseCase};
