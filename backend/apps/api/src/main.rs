//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; application-level errors use the
//! unified `kernel::error::AppError` system.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use accounts::application::{SeedAdminInput, SeedAdminUseCase};
use accounts::{AccountsConfig, AccountsError, PgAccountStore};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::mail::{SmtpConfig, SmtpMailer};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,accounts=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let store = PgAccountStore::new(pool.clone());

    // Seed the admin account from environment, if configured.
    // Failures must not prevent server startup.
    seed_admin(&store).await;

    // Accounts configuration
    let accounts_config = if cfg!(debug_assertions) {
        AccountsConfig {
            restore_link_base: restore_link_base(),
            ..AccountsConfig::development()
        }
    } else {
        // In production, load the token secret from environment
        let secret_b64 =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
        let token_secret = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;

        AccountsConfig {
            token_secret,
            restore_link_base: restore_link_base(),
            ..AccountsConfig::default()
        }
    };

    // Outbound mail
    let smtp_config = SmtpConfig {
        host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(465),
        implicit_tls: env::var("SMTP_SECURE").map(|v| v == "true").unwrap_or(true),
        username: env::var("SMTP_USER").unwrap_or_default(),
        password: env::var("SMTP_PASS").unwrap_or_default(),
        from: env::var("SMTP_FROM")
            .unwrap_or_else(|_| "Shop <no-reply@localhost>".to_string()),
    };
    let mailer = SmtpMailer::new(&smtp_config)?;

    let state = accounts::handlers::AccountsAppState::new(store, mailer, accounts_config);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(accounts::api_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn restore_link_base() -> String {
    env::var("RESTORE_LINK_BASE").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create the bootstrap admin from `SEED_ADMIN_*` env vars.
///
/// Skipped when the variables are absent; warns and continues when the
/// admin already exists or the seed fails.
async fn seed_admin(store: &PgAccountStore) {
    let vars = (
        env::var("SEED_ADMIN_USERNAME"),
        env::var("SEED_ADMIN_PASSWORD"),
        env::var("SEED_ADMIN_EMAIL"),
        env::var("SEED_ADMIN_PHONE"),
    );

    let (Ok(username), Ok(password), Ok(email), Ok(phone)) = vars else {
        tracing::info!("Admin seed variables not set, skipping seed");
        return;
    };

    let use_case = SeedAdminUseCase::new(Arc::new(store.clone()));
    match use_case
        .execute(SeedAdminInput {
            username,
            password,
            email,
            phone,
        })
        .await
    {
        Ok(account) => {
            tracing::info!(account_id = %account.id, "Admin account created");
        }
        Err(AccountsError::AlreadyExists) => {
            tracing::info!("Admin account already exists");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin seed failed, continuing anyway");
        }
    }
}
