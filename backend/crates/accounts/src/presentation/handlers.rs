//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::{
    AccountQueries, AccountsConfig, CreateOwnerInput, CreateOwnerUseCase, DeactivateUseCase,
    RegisterInput, RegisterUseCase, RequestPasswordResetUseCase, RequestRestoreUseCase,
    ResetPasswordUseCase, RestoreAccountUseCase, SignInInput, SignInUseCase, UpdateAccountInput,
    UpdateAccountUseCase,
};
use crate::domain::policy::Requester;
use crate::domain::repository::{AccountRepository, ActivityFilter, ProfileRepository};
use crate::domain::value_object::{AccountId, Role};
use crate::error::AccountsResult;
use crate::presentation::dto::{
    AccountResponse, CreateOwnerRequest, EmailRequest, LoginRequest, LoginResponse,
    MessageResponse, ProfileResponse, PublicProfile, RegisterRequest, RegisterResponse,
    ResetPasswordRequest, TokenRequest, UpdateAccountRequest,
};
use crate::presentation::middleware::{AuthUser, require_role};
use crate::token::TokenService;

/// Shared state for account handlers
pub struct AccountsAppState<R, M>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub store: Arc<R>,
    pub mailer: Arc<M>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AccountsConfig>,
}

impl<R, M> AccountsAppState<R, M>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    /// Build the state; the token service is constructed here from the
    /// injected config, so secrets flow in exactly one direction.
    pub fn new(store: R, mailer: M, config: AccountsConfig) -> Self {
        let tokens = TokenService::new(
            &config.token_secret,
            config.session_ttl,
            config.restore_ttl,
        );

        Self {
            store: Arc::new(store),
            mailer: Arc::new(mailer),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

// Manual Clone: Arc fields clone regardless of R/M.
impl<R, M> Clone for AccountsAppState<R, M>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            mailer: self.mailer.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

fn requester(auth: &AuthUser) -> Requester {
    Requester {
        id: auth.id,
        role: auth.role,
    }
}

// ============================================================================
// Users
// ============================================================================

/// POST /users
pub async fn register<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AccountsResult<impl IntoResponse>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone());

    let (account, profile) = use_case
        .execute(RegisterInput {
            username: req.username,
            password: req.password,
            email: req.email,
            phone: req.phone,
            address: req.address,
            city: req.city,
            location: req.location,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account: AccountResponse::from(&account),
            profile: ProfileResponse::from(&profile),
        }),
    ))
}

/// POST /users/create-owner (Admin)
pub async fn create_owner<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateOwnerRequest>,
) -> AccountsResult<impl IntoResponse>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = CreateOwnerUseCase::new(state.store.clone());

    let account = use_case
        .execute(
            CreateOwnerInput {
                username: req.username,
                password: req.password,
                email: req.email,
                phone: req.phone,
            },
            requester(&auth),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// GET /users (Owner|Admin)
pub async fn list_all<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
) -> AccountsResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    list(state, auth, ActivityFilter::All).await
}

/// GET /users/active (Owner|Admin)
pub async fn list_active<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
) -> AccountsResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    list(state, auth, ActivityFilter::Active).await
}

/// GET /users/inactive (Admin)
pub async fn list_inactive<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
) -> AccountsResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    list(state, auth, ActivityFilter::Inactive).await
}

async fn list<R, M>(
    state: AccountsAppState<R, M>,
    auth: AuthUser,
    filter: ActivityFilter,
) -> AccountsResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let queries = AccountQueries::new(state.store.clone());
    let accounts = queries.list(filter, requester(&auth)).await?;

    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// GET /users/{id} (self, or Owner|Admin)
pub async fn get_account<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AccountsResult<Json<AccountResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let queries = AccountQueries::new(state.store.clone());
    let account = queries
        .get(AccountId::from_i64(id), requester(&auth))
        .await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// PATCH /users/{id}
pub async fn update_account<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAccountRequest>,
) -> AccountsResult<Json<AccountResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = UpdateAccountUseCase::new(state.store.clone(), state.store.clone());

    let account = use_case
        .execute(
            AccountId::from_i64(id),
            UpdateAccountInput {
                username: req.username,
                email: req.email,
                phone: req.phone,
                password: req.password,
                address: req.address,
                city: req.city,
                location: req.location,
            },
            requester(&auth),
        )
        .await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// DELETE /users/me (self-deactivation)
pub async fn deactivate_me<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = DeactivateUseCase::new(state.store.clone());
    use_case.execute(auth.id, requester(&auth)).await?;

    Ok(Json(MessageResponse::new("Account deactivated")))
}

/// DELETE /users/{id} (Owner|Admin)
pub async fn deactivate_account<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    // Customers deactivate themselves through /users/me only.
    require_role(&auth, &[Role::Owner, Role::Admin])?;

    let use_case = DeactivateUseCase::new(state.store.clone());
    use_case
        .execute(AccountId::from_i64(id), requester(&auth))
        .await?;

    Ok(Json(MessageResponse::new("Account deactivated")))
}

// ============================================================================
// Auth
// ============================================================================

/// POST /auth/login
pub async fn login<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AccountsResult<Json<LoginResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.store.clone(), state.tokens.clone());

    let output = use_case
        .execute(SignInInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        user: PublicProfile {
            username: output.username,
            role: output.role,
        },
    }))
}

/// POST /auth/request-restore
pub async fn request_restore<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<EmailRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RequestRestoreUseCase::new(
        state.store.clone(),
        state.mailer.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    Ok(Json(MessageResponse::new("Restoration mail sent")))
}

/// POST /auth/restore-account
pub async fn restore_account<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<TokenRequest>,
) -> AccountsResult<Json<AccountResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RestoreAccountUseCase::new(state.store.clone(), state.tokens.clone());
    let account = use_case.execute(&req.token).await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// POST /auth/request-password-reset
pub async fn request_password_reset<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<EmailRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RequestPasswordResetUseCase::new(
        state.store.clone(),
        state.mailer.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    Ok(Json(MessageResponse::new("Password reset mail sent")))
}

/// POST /auth/reset-password
pub async fn reset_password<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: AccountRepository + ProfileRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(state.store.clone(), state.tokens.clone());
    use_case.execute(&req.token, req.new_password).await?;

    Ok(Json(MessageResponse::new("Password successfully reset")))
}
