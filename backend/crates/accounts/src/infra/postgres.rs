//! PostgreSQL Store Implementation
//!
//! Uniqueness of username and email is enforced by the schema's UNIQUE
//! constraints; violations are translated into the domain's duplicate
//! errors so concurrent check-then-write sequences stay correct.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::{Account, CustomerProfile, NewAccount, NewProfile};
use crate::domain::repository::{AccountRepository, ActivityFilter, ProfileRepository};
use crate::domain::value_object::{
    AccountId, Email, Phone, ProfileId, Role, Username,
};
use crate::error::{AccountsError, AccountsResult};
use platform::password::HashedPassword;

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountStore {
    async fn insert(&self, account: NewAccount) -> AccountsResult<Account> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (
                username,
                password_hash,
                email,
                phone,
                role,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
            RETURNING
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.email.as_str())
        .bind(account.phone.as_str())
        .bind(account.role.id())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_conflict)?;

        row.into_account()
    }

    async fn insert_with_profile(
        &self,
        account: NewAccount,
        profile: NewProfile,
    ) -> AccountsResult<(Account, CustomerProfile)> {
        let now = Utc::now();

        // One transaction: an account must never exist without its profile.
        let mut tx = self.pool.begin().await?;

        let account_row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (
                username,
                password_hash,
                email,
                phone,
                role,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
            RETURNING
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.email.as_str())
        .bind(account.phone.as_str())
        .bind(account.role.id())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(translate_conflict)?;

        let profile_row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO customer_profiles (
                account_id,
                address,
                city,
                location,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING
                id, account_id, address, city, location, created_at, updated_at
            "#,
        )
        .bind(account_row.id)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.location)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((account_row.into_account()?, profile_row.into_profile()))
    }

    async fn find_by_id(&self, id: AccountId) -> AccountsResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AccountsResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_active_by_username(&self, username: &str) -> AccountsResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            FROM accounts
            WHERE username = $1 AND is_active = TRUE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AccountsResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn update(&self, account: &Account) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                username = $2,
                password_hash = $3,
                email = $4,
                phone = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_i64())
        .bind(account.username.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.email.as_str())
        .bind(account.phone.as_str())
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(translate_conflict)?;

        Ok(())
    }

    async fn set_inactive(&self, id: AccountId) -> AccountsResult<bool> {
        let affected = sqlx::query(
            "UPDATE accounts SET is_active = FALSE, updated_at = $2 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn activate(&self, id: AccountId) -> AccountsResult<bool> {
        // Conditional write: only flips rows that are currently inactive.
        let affected = sqlx::query(
            r#"
            UPDATE accounts SET is_active = TRUE, updated_at = $2
            WHERE id = $1 AND is_active = FALSE
            "#,
        )
        .bind(id.as_i64())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn list(&self, filter: ActivityFilter) -> AccountsResult<Vec<Account>> {
        let base = r#"
            SELECT
                id, username, password_hash, email, phone,
                role, is_active, created_at, updated_at
            FROM accounts
        "#;

        let rows = match filter {
            ActivityFilter::All => {
                sqlx::query_as::<_, AccountRow>(&format!("{base} ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await?
            }
            ActivityFilter::Active => {
                sqlx::query_as::<_, AccountRow>(&format!(
                    "{base} WHERE is_active = TRUE ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
            ActivityFilter::Inactive => {
                sqlx::query_as::<_, AccountRow>(&format!(
                    "{base} WHERE is_active = FALSE ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(|r| r.into_account()).collect()
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgAccountStore {
    async fn find_by_account_id(
        &self,
        account_id: AccountId,
    ) -> AccountsResult<Option<CustomerProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                id, account_id, address, city, location, created_at, updated_at
            FROM customer_profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_profile()))
    }

    async fn update(&self, profile: &CustomerProfile) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE customer_profiles SET
                address = $2,
                city = $3,
                location = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(profile.id.as_i64())
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.location)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Conflict translation
// ============================================================================

/// Translate a Postgres unique-violation into the matching domain error.
///
/// The constraint names come from the schema in `database/migrations`.
fn translate_conflict(err: sqlx::Error) -> AccountsError {
    if let sqlx::Error::Database(db_err) = &err {
        // 23505 = unique_violation
        if db_err.code().as_deref() == Some("23505") {
            match db_err.constraint() {
                Some("accounts_username_key") => return AccountsError::DuplicateUsername,
                Some("accounts_email_key") => return AccountsError::DuplicateEmail,
                _ => {}
            }
        }
    }
    AccountsError::Database(err)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password_hash: String,
    email: String,
    phone: String,
    role: i16,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountsResult<Account> {
        let password_hash = HashedPassword::from_phc_string(&self.password_hash)
            .map_err(|e| AccountsError::Internal(format!("Invalid password hash: {}", e)))?;

        let role = Role::from_id(self.role)
            .ok_or_else(|| AccountsError::Internal(format!("Invalid role id: {}", self.role)))?;

        Ok(Account {
            id: AccountId::from_i64(self.id),
            username: Username::from_db(self.username),
            password_hash,
            email: Email::from_db(self.email),
            phone: Phone::from_db(self.phone),
            is_active: self.is_active,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    account_id: i64,
    address: String,
    city: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> CustomerProfile {
        CustomerProfile {
            id: ProfileId::from_i64(self.id),
            account_id: AccountId::from_i64(self.account_id),
            address: self.address,
            city: self.city,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
