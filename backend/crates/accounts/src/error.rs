//! Accounts Error Types
//!
//! This module provides the account-domain error taxonomy and integrates it
//! with the unified `kernel::error::AppError` system at the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::policy::PolicyDenial;
use crate::token::TokenError;

/// Accounts-specific result type alias
pub type AccountsResult<T> = Result<T, AccountsError>;

/// Account-domain error variants
#[derive(Debug, Error)]
pub enum AccountsError {
    /// Unknown username or wrong password; deliberately one variant so the
    /// two cases are indistinguishable to callers.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username already taken by another account
    #[error("Username already exists")]
    DuplicateUsername,

    /// Email already taken by another account
    #[error("Email already exists")]
    DuplicateEmail,

    /// Account does not exist (or is not visible to this flow)
    #[error("User not found")]
    NotFound,

    /// Authorization policy denial
    #[error("{0}")]
    Forbidden(#[from] PolicyDenial),

    /// Malformed or invalid request data
    #[error("{0}")]
    InvalidInput(String),

    /// Token past its expiry
    #[error("Token expired")]
    TokenExpired,

    /// Token signature or shape invalid
    #[error("Invalid token")]
    TokenInvalid,

    /// Structurally valid token presented to the wrong flow
    #[error("Invalid token type")]
    WrongTokenPurpose,

    /// Restore called on an account that is already active
    #[error("Account is already active")]
    AlreadyActive,

    /// Seed-time guard: the bootstrap admin already exists
    #[error("Admin already exists")]
    AlreadyExists,

    /// Update payload narrowed down to nothing applicable
    #[error("No updatable fields in request")]
    NoUpdatableFields,

    /// Outbound mail could not be delivered
    #[error("Mail delivery failed: {0}")]
    MailDelivery(#[from] platform::mail::MailError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountsError {
    /// Shorthand for input-validation failures.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AccountsError::InvalidInput(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountsError::DuplicateUsername | AccountsError::DuplicateEmail => {
                StatusCode::CONFLICT
            }
            AccountsError::NotFound => StatusCode::NOT_FOUND,
            AccountsError::Forbidden(_) => StatusCode::FORBIDDEN,
            AccountsError::InvalidInput(_)
            | AccountsError::AlreadyActive
            | AccountsError::AlreadyExists
            | AccountsError::NoUpdatableFields => StatusCode::BAD_REQUEST,
            AccountsError::TokenExpired
            | AccountsError::TokenInvalid
            | AccountsError::WrongTokenPurpose => StatusCode::UNAUTHORIZED,
            AccountsError::MailDelivery(_) => StatusCode::BAD_GATEWAY,
            AccountsError::Database(_) | AccountsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountsError::InvalidCredentials
            | AccountsError::TokenExpired
            | AccountsError::TokenInvalid
            | AccountsError::WrongTokenPurpose => ErrorKind::Unauthorized,
            AccountsError::DuplicateUsername | AccountsError::DuplicateEmail => ErrorKind::Conflict,
            AccountsError::NotFound => ErrorKind::NotFound,
            AccountsError::Forbidden(_) => ErrorKind::Forbidden,
            AccountsError::InvalidInput(_)
            | AccountsError::AlreadyActive
            | AccountsError::AlreadyExists
            | AccountsError::NoUpdatableFields => ErrorKind::BadRequest,
            AccountsError::MailDelivery(_) => ErrorKind::BadGateway,
            AccountsError::Database(_) | AccountsError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError.
    ///
    /// Token sub-kinds collapse into one uniform 401 message so clients
    /// cannot tell expired from forged; the distinction stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountsError::TokenExpired
            | AccountsError::TokenInvalid
            | AccountsError::WrongTokenPurpose => {
                AppError::unauthorized("Invalid or expired token")
            }
            AccountsError::MailDelivery(_) => {
                AppError::bad_gateway("Failed to send recovery email")
            }
            AccountsError::Database(_) | AccountsError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountsError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountsError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountsError::MailDelivery(e) => {
                tracing::error!(error = %e, "Recovery mail delivery failed");
            }
            AccountsError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountsError::TokenExpired => {
                tracing::debug!("Expired token presented");
            }
            AccountsError::TokenInvalid => {
                tracing::warn!("Invalid token presented");
            }
            AccountsError::WrongTokenPurpose => {
                tracing::warn!("Token presented to the wrong flow");
            }
            AccountsError::Forbidden(denial) => {
                tracing::debug!(denial = %denial, "Authorization denied");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<TokenError> for AccountsError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AccountsError::TokenExpired,
            TokenError::Invalid => AccountsError::TokenInvalid,
            TokenError::Signing(msg) => AccountsError::Internal(msg),
        }
    }
}

impl From<AppError> for AccountsError {
    fn from(err: AppError) -> Self {
        // Value-object validation produces BadRequest AppErrors; anything
        // else reaching here is unexpected.
        if err.kind() == ErrorKind::BadRequest {
            AccountsError::InvalidInput(err.message().to_string())
        } else {
            AccountsError::Internal(err.to_string())
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AccountsError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AccountsError::InvalidInput(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AccountsError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AccountsError::Internal(err.to_string())
    }
}
