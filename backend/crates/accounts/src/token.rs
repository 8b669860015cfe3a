//! Signed Token Service
//!
//! Issues and verifies the two bearer credentials the system uses:
//! short-lived *session* tokens (carrying username and role for downstream
//! authorization) and *restore* tokens (carrying only the subject id, used
//! by the password-reset and account-restoration flows).
//!
//! The signing secret is injected at construction; there is no module-level
//! state. Rotating the secret invalidates every outstanding token, which is
//! acceptable because both TTLs are minutes, not days.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entity::Account;
use crate::domain::value_object::{AccountId, Role};

/// The `type` claim value that marks a restore token.
pub const RESTORE_TOKEN_TYPE: &str = "restore";

/// Token verification/issuance errors.
///
/// `verify` returns only `Expired` or `Invalid`; the two must stay
/// distinguishable because the recovery flows log them differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token's expiry has passed
    #[error("Token expired")]
    Expired,

    /// Signature mismatch or malformed token
    #[error("Invalid token")]
    Invalid,

    /// Issuance failed (never returned by `verify`)
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// What a verified token is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Session,
    Restore,
}

/// Signed token claims.
///
/// Session tokens carry `username` and `role` and no `type` field; restore
/// tokens carry only the subject id plus `type = "restore"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject account id
    pub sub: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Purpose discriminator; absent on session tokens
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Classify the token by its discriminator.
    ///
    /// Anything with an unrecognized `type` value matches neither purpose,
    /// so both flows reject it.
    pub fn purpose(&self) -> Option<TokenPurpose> {
        match self.token_type.as_deref() {
            None => Some(TokenPurpose::Session),
            Some(RESTORE_TOKEN_TYPE) => Some(TokenPurpose::Restore),
            Some(_) => None,
        }
    }

    pub fn subject(&self) -> AccountId {
        AccountId::from_i64(self.sub)
    }
}

/// HS256 token service with an injected process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    session_ttl: Duration,
    restore_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], session_ttl: Duration, restore_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // TTLs are short; no leeway so expiry is exact.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            session_ttl,
            restore_ttl,
        }
    }

    /// Issue a session token for a signed-in account.
    pub fn issue_session(&self, account: &Account) -> Result<String, TokenError> {
        let claims = self.claims(
            account.id,
            Some(account.username.as_str().to_string()),
            Some(account.role),
            None,
            self.session_ttl,
        );
        self.sign(&claims)
    }

    /// Issue a restore token for the recovery flows.
    pub fn issue_restore(&self, subject: AccountId) -> Result<String, TokenError> {
        let claims = self.claims(
            subject,
            None,
            None,
            Some(RESTORE_TOKEN_TYPE.to_string()),
            self.restore_ttl,
        );
        self.sign(&claims)
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Purpose checking is the caller's next step; a structurally valid
    /// token of the wrong purpose verifies fine here.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    fn claims(
        &self,
        subject: AccountId,
        username: Option<String>,
        role: Option<Role>,
        token_type: Option<String>,
        ttl: Duration,
    ) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: subject.as_i64(),
            username,
            role,
            token_type,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Email, Phone, Username};
    use platform::password::ClearPassword;

    const SECRET: &[u8] = b"test-secret";
    const TTL: Duration = Duration::from_secs(15 * 60);

    fn service() -> TokenService {
        TokenService::new(SECRET, TTL, TTL)
    }

    fn account() -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::from_i64(7),
            username: Username::new("mario").unwrap(),
            password_hash: ClearPassword::new("hunter2hunter2".to_string())
                .unwrap()
                .hash()
                .unwrap(),
            email: Email::new("mario@example.com").unwrap(),
            phone: Phone::new("1144445555").unwrap(),
            is_active: true,
            role: Role::Owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Encode arbitrary claims with the test secret, bypassing the service.
    fn encode_raw(claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_session_token_roundtrip() {
        let service = service();
        let token = service.issue_session(&account()).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username.as_deref(), Some("mario"));
        assert_eq!(claims.role, Some(Role::Owner));
        assert_eq!(claims.purpose(), Some(TokenPurpose::Session));
    }

    #[test]
    fn test_restore_token_roundtrip() {
        let service = service();
        let token = service.issue_restore(AccountId::from_i64(3)).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.subject(), AccountId::from_i64(3));
        assert_eq!(claims.username, None);
        assert_eq!(claims.role, None);
        assert_eq!(claims.purpose(), Some(TokenPurpose::Restore));
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            username: None,
            role: None,
            token_type: Some(RESTORE_TOKEN_TYPE.to_string()),
            iat: now - 3600,
            exp: now - 60,
        };

        let result = service.verify(&encode_raw(&claims));
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token_is_invalid_not_expired() {
        let service = service();
        let other = TokenService::new(b"other-secret", TTL, TTL);
        let token = other.issue_session(&account()).unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Invalid));
        assert_eq!(service.verify("garbage"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_unknown_type_matches_no_purpose() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: None,
            role: None,
            token_type: Some("refresh".to_string()),
            iat: now,
            exp: now + 60,
        };
        assert_eq!(claims.purpose(), None);
    }
}
