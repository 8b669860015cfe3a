//! Accounts Routers

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use platform::mail::Mailer;

use crate::domain::repository::{AccountRepository, ProfileRepository};
use crate::presentation::handlers::{self, AccountsAppState};
use crate::presentation::middleware::require_session;

/// Routes under `/users`.
///
/// Everything except registration sits behind the session middleware;
/// `POST /` is added after the `route_layer` call so it stays public.
pub fn users_router<R, M>(state: AccountsAppState<R, M>) -> Router
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .route("/create-owner", post(handlers::create_owner::<R, M>))
        .route("/", get(handlers::list_all::<R, M>))
        .route("/active", get(handlers::list_active::<R, M>))
        .route("/inactive", get(handlers::list_inactive::<R, M>))
        .route("/me", delete(handlers::deactivate_me::<R, M>))
        .route(
            "/{id}",
            get(handlers::get_account::<R, M>)
                .patch(handlers::update_account::<R, M>)
                .delete(handlers::deactivate_account::<R, M>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session::<R, M>,
        ))
        .route("/", post(handlers::register::<R, M>))
        .with_state(state)
}

/// Routes under `/auth`. All public: login authenticates, and the recovery
/// endpoints are authorized by the tokens they carry, not by a session.
pub fn auth_router<R, M>(state: AccountsAppState<R, M>) -> Router
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<R, M>))
        .route("/request-restore", post(handlers::request_restore::<R, M>))
        .route("/restore-account", post(handlers::restore_account::<R, M>))
        .route(
            "/request-password-reset",
            post(handlers::request_password_reset::<R, M>),
        )
        .route("/reset-password", post(handlers::reset_password::<R, M>))
        .with_state(state)
}

/// The full API surface: `/users` + `/auth`.
pub fn api_router<R, M>(state: AccountsAppState<R, M>) -> Router
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .nest("/users", users_router(state.clone()))
        .nest("/auth", auth_router(state))
}
