//! Use-case tests over the in-memory store.
//!
//! These cover the account lifecycle and the authentication/recovery flows
//! end to end, without HTTP: registration, duplicate handling, sign-in,
//! token purposes, the reset/restore round trips, and the deliberate
//! deactivate/restore asymmetry.

mod common;

use std::sync::Arc;

use accounts::application::{
    CreateOwnerInput, CreateOwnerUseCase, DeactivateUseCase, RegisterInput, RegisterUseCase,
    RequestPasswordResetUseCase, RequestRestoreUseCase, ResetPasswordUseCase,
    RestoreAccountUseCase, SeedAdminInput, SeedAdminUseCase, SignInInput, SignInUseCase,
    UpdateAccountInput, UpdateAccountUseCase,
};
use accounts::domain::policy::{PolicyDenial, Requester};
use accounts::domain::repository::AccountRepository;
use accounts::models::Role;
use accounts::token::Claims;
use accounts::{AccountsError, MemoryAccountStore, TokenService};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use common::{
    FailingMailer, RecordingMailer, register_customer, seed_admin, test_config, token_from_mail,
};

fn store() -> Arc<MemoryAccountStore> {
    Arc::new(MemoryAccountStore::new())
}

fn tokens() -> Arc<TokenService> {
    let config = test_config();
    Arc::new(TokenService::new(
        &config.token_secret,
        config.session_ttl,
        config.restore_ttl,
    ))
}

fn register_input(username: &str, email: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_string(),
        password: "a-decent-password".to_string(),
        email: email.to_string(),
        phone: "1144445555".to_string(),
        address: "123 Main St".to_string(),
        city: "Springfield".to_string(),
        location: Some("North".to_string()),
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_creates_active_customer_with_profile() {
    let store = store();

    let (account, profile) = RegisterUseCase::new(store.clone())
        .execute(register_input("mario", "mario@example.com"))
        .await
        .unwrap();

    assert_eq!(account.role, Role::Customer);
    assert!(account.is_active);
    assert_eq!(account.email.as_str(), "mario@example.com");

    assert_eq!(profile.account_id, account.id);
    assert_eq!(profile.address, "123 Main St");
    assert_eq!(profile.city, "Springfield");
    assert_eq!(profile.location.as_deref(), Some("North"));
}

#[tokio::test]
async fn duplicate_username_rejected_without_mutating_first() {
    let store = store();
    let use_case = RegisterUseCase::new(store.clone());

    let (first, _) = use_case
        .execute(register_input("mario", "mario@example.com"))
        .await
        .unwrap();

    let err = use_case
        .execute(register_input("mario", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::DuplicateUsername));

    // The first account is untouched.
    let reloaded = store.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(reloaded.email.as_str(), "mario@example.com");
    assert_eq!(reloaded.updated_at, first.updated_at);
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let store = store();
    let use_case = RegisterUseCase::new(store.clone());

    use_case
        .execute(register_input("mario", "mario@example.com"))
        .await
        .unwrap();

    let err = use_case
        .execute(register_input("luigi", "mario@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::DuplicateEmail));
}

#[tokio::test]
async fn registration_validates_input() {
    let store = store();
    let use_case = RegisterUseCase::new(store.clone());

    // Username too short
    let err = use_case
        .execute(register_input("abc", "abc@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::InvalidInput(_)));

    // Bad email
    let mut input = register_input("mario", "not-an-email");
    let err = use_case.execute(input).await.unwrap_err();
    assert!(matches!(err, AccountsError::InvalidInput(_)));

    // Bad phone
    input = register_input("mario", "mario@example.com");
    input.phone = "12-34".to_string();
    let err = use_case.execute(input).await.unwrap_err();
    assert!(matches!(err, AccountsError::InvalidInput(_)));

    // Short password
    input = register_input("mario", "mario@example.com");
    input.password = "short".to_string();
    let err = use_case.execute(input).await.unwrap_err();
    assert!(matches!(err, AccountsError::InvalidInput(_)));
}

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn sign_in_issues_token_for_the_right_subject() {
    let store = store();
    let tokens = tokens();
    let account = register_customer(&store, "mario").await;

    let output = SignInUseCase::new(store.clone(), tokens.clone())
        .execute(SignInInput {
            username: "mario".to_string(),
            password: "mario-password-1".to_string(),
        })
        .await
        .unwrap();

    let claims = tokens.verify(&output.access_token).unwrap();
    assert_eq!(claims.sub, account.id.as_i64());
    assert_eq!(claims.role, Some(Role::Customer));
    assert_eq!(output.username, "mario");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let store = store();
    let tokens = tokens();
    register_customer(&store, "mario").await;

    let use_case = SignInUseCase::new(store.clone(), tokens);

    let wrong_password = use_case
        .execute(SignInInput {
            username: "mario".to_string(),
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();

    let unknown_user = use_case
        .execute(SignInInput {
            username: "nobody".to_string(),
            password: "whatever-password".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AccountsError::InvalidCredentials));
    assert!(matches!(unknown_user, AccountsError::InvalidCredentials));
    // Same user-facing message, same status.
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.status_code(), unknown_user.status_code());
}

#[tokio::test]
async fn deactivated_accounts_cannot_sign_in() {
    let store = store();
    let tokens = tokens();
    let account = register_customer(&store, "mario").await;

    DeactivateUseCase::new(store.clone())
        .execute(
            account.id,
            Requester {
                id: account.id,
                role: Role::Customer,
            },
        )
        .await
        .unwrap();

    let err = SignInUseCase::new(store.clone(), tokens)
        .execute(SignInInput {
            username: "mario".to_string(),
            password: "mario-password-1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::InvalidCredentials));
}

// ============================================================================
// Token purposes and expiry
// ============================================================================

#[tokio::test]
async fn session_token_is_rejected_by_restore_flows() {
    let store = store();
    let tokens = tokens();
    let account = register_customer(&store, "mario").await;

    let session_token = tokens.issue_session(&account).unwrap();

    let restore_err = RestoreAccountUseCase::new(store.clone(), tokens.clone())
        .execute(&session_token)
        .await
        .unwrap_err();
    assert!(matches!(restore_err, AccountsError::WrongTokenPurpose));

    let reset_err = ResetPasswordUseCase::new(store.clone(), tokens.clone())
        .execute(&session_token, "a-new-password-1".to_string())
        .await
        .unwrap_err();
    assert!(matches!(reset_err, AccountsError::WrongTokenPurpose));
}

#[tokio::test]
async fn expired_restore_token_is_rejected() {
    let store = store();
    let tokens = tokens();
    let account = register_customer(&store, "mario").await;

    // Mint a restore token whose expiry has already passed, signed with the
    // same secret the service uses.
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: account.id.as_i64(),
        username: None,
        role: None,
        token_type: Some("restore".to_string()),
        iat: now - 3600,
        exp: now - 60,
    };
    let expired = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"accounts-test-secret"),
    )
    .unwrap();

    let err = ResetPasswordUseCase::new(store.clone(), tokens.clone())
        .execute(&expired, "a-new-password-1".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::TokenExpired));

    let err = RestoreAccountUseCase::new(store.clone(), tokens)
        .execute(&expired)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::TokenExpired));
}

// ============================================================================
// Password reset round trip
// ============================================================================

#[tokio::test]
async fn password_reset_round_trip() {
    let store = store();
    let tokens = tokens();
    let mailer = Arc::new(RecordingMailer::new());
    let config = Arc::new(test_config());
    register_customer(&store, "mario").await;

    RequestPasswordResetUseCase::new(
        store.clone(),
        mailer.clone(),
        tokens.clone(),
        config.clone(),
    )
    .execute("mario@example.com")
    .await
    .unwrap();

    let mail = mailer.last();
    assert_eq!(mail.to, "mario@example.com");
    let token = token_from_mail(&mail.body);

    ResetPasswordUseCase::new(store.clone(), tokens.clone())
        .execute(&token, "brand-new-password".to_string())
        .await
        .unwrap();

    // New password verifies, old one no longer does.
    let sign_in = SignInUseCase::new(store.clone(), tokens);
    assert!(
        sign_in
            .execute(SignInInput {
                username: "mario".to_string(),
                password: "brand-new-password".to_string(),
            })
            .await
            .is_ok()
    );
    assert!(matches!(
        sign_in
            .execute(SignInInput {
                username: "mario".to_string(),
                password: "mario-password-1".to_string(),
            })
            .await
            .unwrap_err(),
        AccountsError::InvalidCredentials
    ));
}

#[tokio::test]
async fn password_reset_requires_an_active_account() {
    let store = store();
    let tokens = tokens();
    let mailer = Arc::new(RecordingMailer::new());
    let config = Arc::new(test_config());
    let account = register_customer(&store, "mario").await;

    DeactivateUseCase::new(store.clone())
        .execute(
            account.id,
            Requester {
                id: account.id,
                role: Role::Customer,
            },
        )
        .await
        .unwrap();

    let err = RequestPasswordResetUseCase::new(store.clone(), mailer, tokens, config)
        .execute("mario@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::NotFound));
}

#[tokio::test]
async fn mail_failure_aborts_the_request() {
    let store = store();
    let tokens = tokens();
    let config = Arc::new(test_config());
    register_customer(&store, "mario").await;

    let err = RequestPasswordResetUseCase::new(
        store.clone(),
        Arc::new(FailingMailer),
        tokens,
        config,
    )
    .execute("mario@example.com")
    .await
    .unwrap_err();
    assert!(matches!(err, AccountsError::MailDelivery(_)));
}

// ============================================================================
// Deactivation / restoration
// ============================================================================

#[tokio::test]
async fn restore_round_trip_for_deactivated_account() {
    let store = store();
    let tokens = tokens();
    let mailer = Arc::new(RecordingMailer::new());
    let config = Arc::new(test_config());
    let account = register_customer(&store, "mario").await;

    DeactivateUseCase::new(store.clone())
        .execute(
            account.id,
            Requester {
                id: account.id,
                role: Role::Customer,
            },
        )
        .await
        .unwrap();

    // Restore requests only work for deactivated accounts.
    RequestRestoreUseCase::new(store.clone(), mailer.clone(), tokens.clone(), config)
        .execute("mario@example.com")
        .await
        .unwrap();

    let token = token_from_mail(&mailer.last().body);
    let restored = RestoreAccountUseCase::new(store.clone(), tokens.clone())
        .execute(&token)
        .await
        .unwrap();

    assert!(restored.is_active);
    assert!(
        SignInUseCase::new(store.clone(), tokens)
            .execute(SignInInput {
                username: "mario".to_string(),
                password: "mario-password-1".to_string(),
            })
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn restore_request_rejects_active_accounts() {
    let store = store();
    let tokens = tokens();
    let mailer = Arc::new(RecordingMailer::new());
    let config = Arc::new(test_config());
    register_customer(&store, "mario").await;

    let err = RequestRestoreUseCase::new(store.clone(), mailer, tokens, config)
        .execute("mario@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::NotFound));
}

#[tokio::test]
async fn double_deactivate_does_not_error() {
    // Current observed behavior: deactivation is not idempotency-guarded,
    // unlike restoration. This test pins that asymmetry.
    let store = store();
    let account = register_customer(&store, "mario").await;
    let requester = Requester {
        id: account.id,
        role: Role::Customer,
    };

    let use_case = DeactivateUseCase::new(store.clone());
    use_case.execute(account.id, requester).await.unwrap();
    use_case.execute(account.id, requester).await.unwrap();

    let reloaded = store.find_by_id(account.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
}

#[tokio::test]
async fn restore_of_active_account_fails_and_changes_nothing() {
    let store = store();
    let tokens = tokens();
    let account = register_customer(&store, "mario").await;

    let token = tokens.issue_restore(account.id).unwrap();
    let err = RestoreAccountUseCase::new(store.clone(), tokens)
        .execute(&token)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::AlreadyActive));

    let reloaded = store.find_by_id(account.id).await.unwrap().unwrap();
    assert!(reloaded.is_active);
    assert_eq!(reloaded.updated_at, account.updated_at);
}

// ============================================================================
// Role-gated operations
// ============================================================================

#[tokio::test]
async fn only_admins_create_owners() {
    let store = store();
    let admin = seed_admin(&store).await;
    let customer = register_customer(&store, "mario").await;

    let use_case = CreateOwnerUseCase::new(store.clone());

    let input = || CreateOwnerInput {
        username: "owner1".to_string(),
        password: "owner-password-1".to_string(),
        email: "owner1@example.com".to_string(),
        phone: "1155556666".to_string(),
    };

    let err = use_case
        .execute(
            input(),
            Requester {
                id: customer.id,
                role: Role::Customer,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountsError::Forbidden(PolicyDenial::AdminRequired)
    ));

    let owner = use_case
        .execute(
            input(),
            Requester {
                id: admin.id,
                role: Role::Admin,
            },
        )
        .await
        .unwrap();
    assert_eq!(owner.role, Role::Owner);
    assert!(owner.is_active);
}

#[tokio::test]
async fn admins_are_never_deactivated() {
    let store = store();
    let admin = seed_admin(&store).await;

    // Not even by another admin.
    let err = DeactivateUseCase::new(store.clone())
        .execute(
            admin.id,
            Requester {
                id: admin.id,
                role: Role::Admin,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountsError::Forbidden(PolicyDenial::AdminImmutable)
    ));

    let reloaded = store.find_by_id(admin.id).await.unwrap().unwrap();
    assert!(reloaded.is_active);
}

#[tokio::test]
async fn owners_deactivate_customers_only() {
    let store = store();
    let admin = seed_admin(&store).await;
    let customer = register_customer(&store, "mario").await;

    let owner = CreateOwnerUseCase::new(store.clone())
        .execute(
            CreateOwnerInput {
                username: "owner1".to_string(),
                password: "owner-password-1".to_string(),
                email: "owner1@example.com".to_string(),
                phone: "1155556666".to_string(),
            },
            Requester {
                id: admin.id,
                role: Role::Admin,
            },
        )
        .await
        .unwrap();

    let other_owner = CreateOwnerUseCase::new(store.clone())
        .execute(
            CreateOwnerInput {
                username: "owner2".to_string(),
                password: "owner-password-2".to_string(),
                email: "owner2@example.com".to_string(),
                phone: "1155557777".to_string(),
            },
            Requester {
                id: admin.id,
                role: Role::Admin,
            },
        )
        .await
        .unwrap();

    let use_case = DeactivateUseCase::new(store.clone());
    let as_owner = Requester {
        id: owner.id,
        role: Role::Owner,
    };

    let err = use_case.execute(other_owner.id, as_owner).await.unwrap_err();
    assert!(matches!(
        err,
        AccountsError::Forbidden(PolicyDenial::OwnerDeactivatesCustomersOnly)
    ));

    use_case.execute(customer.id, as_owner).await.unwrap();
    let reloaded = store.find_by_id(customer.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
}

// ============================================================================
// Updates
// ============================================================================

#[tokio::test]
async fn customer_self_update_is_narrowed() {
    let store = store();
    let account = register_customer(&store, "mario").await;
    let requester = Requester {
        id: account.id,
        role: Role::Customer,
    };

    let use_case = UpdateAccountUseCase::new(store.clone(), store.clone());

    // Username is dropped; email still applies.
    let updated = use_case
        .execute(
            account.id,
            UpdateAccountInput {
                username: Some("hacked".to_string()),
                email: Some("new@example.com".to_string()),
                ..Default::default()
            },
            requester,
        )
        .await
        .unwrap();

    assert_eq!(updated.username.as_str(), "mario");
    assert_eq!(updated.email.as_str(), "new@example.com");

    // A payload that narrows down to nothing is an error.
    let err = use_case
        .execute(
            account.id,
            UpdateAccountInput {
                username: Some("hacked".to_string()),
                ..Default::default()
            },
            requester,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::NoUpdatableFields));
}

#[tokio::test]
async fn customer_cannot_update_other_accounts() {
    let store = store();
    let mario = register_customer(&store, "mario").await;
    let luigi = register_customer(&store, "luigi").await;

    let err = UpdateAccountUseCase::new(store.clone(), store.clone())
        .execute(
            mario.id,
            UpdateAccountInput {
                email: Some("evil@example.com".to_string()),
                ..Default::default()
            },
            Requester {
                id: luigi.id,
                role: Role::Customer,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountsError::Forbidden(PolicyDenial::NotOwnAccount)
    ));
}

#[tokio::test]
async fn update_rechecks_uniqueness_against_other_accounts() {
    let store = store();
    let admin = seed_admin(&store).await;
    register_customer(&store, "mario").await;
    let luigi = register_customer(&store, "luigi").await;

    let err = UpdateAccountUseCase::new(store.clone(), store.clone())
        .execute(
            luigi.id,
            UpdateAccountInput {
                email: Some("mario@example.com".to_string()),
                ..Default::default()
            },
            Requester {
                id: admin.id,
                role: Role::Admin,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::DuplicateEmail));
}

#[tokio::test]
async fn customer_profile_fields_update_through_the_same_path() {
    let store = store();
    let account = register_customer(&store, "mario").await;
    let requester = Requester {
        id: account.id,
        role: Role::Customer,
    };

    UpdateAccountUseCase::new(store.clone(), store.clone())
        .execute(
            account.id,
            UpdateAccountInput {
                address: Some("456 Elm St".to_string()),
                city: Some("Shelbyville".to_string()),
                ..Default::default()
            },
            requester,
        )
        .await
        .unwrap();

    use accounts::domain::repository::ProfileRepository;
    let profile = store
        .find_by_account_id(account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.address, "456 Elm St");
    assert_eq!(profile.city, "Shelbyville");
}

// ============================================================================
// Admin seed
// ============================================================================

#[tokio::test]
async fn admin_seed_is_guarded_against_reruns() {
    let store = store();
    let use_case = SeedAdminUseCase::new(store.clone());

    let input = || SeedAdminInput {
        username: "admin".to_string(),
        password: "admin-password-1".to_string(),
        email: "admin@example.com".to_string(),
        phone: "1100000000".to_string(),
    };

    let admin = use_case.execute(input()).await.unwrap();
    assert_eq!(admin.role, Role::Admin);

    let err = use_case.execute(input()).await.unwrap_err();
    assert!(matches!(err, AccountsError::AlreadyExists));
}
