//! Session Middleware
//!
//! Bearer-token authentication for protected routes. On success the
//! verified principal is inserted into request extensions as [`AuthUser`];
//! handlers take it from there and run the authorization policy themselves.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use platform::bearer::extract_bearer_token;
use platform::mail::Mailer;

use crate::domain::policy::PolicyDenial;
use crate::domain::repository::{AccountRepository, ProfileRepository};
use crate::domain::value_object::{AccountId, Role};
use crate::error::AccountsError;
use crate::presentation::handlers::AccountsAppState;
use crate::token::TokenPurpose;

/// The authenticated principal, extracted from a verified session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: AccountId,
    pub username: String,
    pub role: Role,
}

/// Middleware that requires a valid session token.
///
/// Missing or unverifiable tokens 401. So does a restore token: it is a
/// different credential and must never open a session.
pub async fn require_session<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Some(token) = extract_bearer_token(req.headers()) else {
        return Err(AccountsError::TokenInvalid.into_response());
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => return Err(AccountsError::from(e).into_response()),
    };

    if claims.purpose() != Some(TokenPurpose::Session) {
        return Err(AccountsError::WrongTokenPurpose.into_response());
    }

    // Session tokens always carry these; their absence means the token was
    // minted by something else entirely.
    let (Some(username), Some(role)) = (claims.username.clone(), claims.role) else {
        return Err(AccountsError::TokenInvalid.into_response());
    };

    req.extensions_mut().insert(AuthUser {
        id: claims.subject(),
        username,
        role,
    });

    Ok(next.run(req).await)
}

/// Explicit route-level role gate.
///
/// Used where a route is closed to whole roles before any target-specific
/// policy runs (e.g. `DELETE /users/{id}` is Owner/Admin only; customers
/// have `/users/me`).
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AccountsError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AccountsError::Forbidden(PolicyDenial::NotOwnAccount))
    }
}
