// ABOUTME: Signed session tokens (HS256 JWT) carried in the session cookie
// ABOUTME: Encodes account id, role and display name with a 24 hour expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{Account, Role};

/// Claims stored in the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id
    pub sub: i64,
    /// Account role at login time
    pub role: Role,
    /// Display name for the page header
    pub name: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// The logged-in user as seen by handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Account id
    pub account_id: i64,
    /// Role
    pub role: Role,
    /// Display name
    pub name: String,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            account_id: claims.sub,
            role: claims.role,
            name: claims.name,
        }
    }
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionManager {
    /// Create a manager signing with `secret`
    #[must_use]
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Session lifetime in seconds (cookie Max-Age)
    #[must_use]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for an account
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails
    pub fn issue(&self, account: &Account) -> AppResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: account.account_id,
            role: account.role,
            name: account.full_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session: {e}")))
    }

    /// Verify a token and return its user
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for a tampered, malformed or expired token
    pub fn verify(&self, token: &str) -> AppResult<SessionUser> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.into())
            .map_err(|e| {
                debug!(error = %e, "Rejected session token");
                AppError::auth_invalid("Session is invalid or expired")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthProvider;

    fn account() -> Account {
        Account {
            account_id: 42,
            email: "learner@example.com".to_owned(),
            password_hash: String::new(),
            full_name: "Lan Nguyen".to_owned(),
            role: Role::Student,
            is_verified: true,
            avatar_url: None,
            auth_provider: AuthProvider::Email,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let manager = SessionManager::new("test-secret", 24);
        let token = manager.issue(&account()).unwrap();
        let user = manager.verify(&token).unwrap();
        assert_eq!(user.account_id, 42);
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.name, "Lan Nguyen");
        assert_eq!(manager.ttl_secs(), 86_400);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionManager::new("one", 24).issue(&account()).unwrap();
        assert!(SessionManager::new("two", 24).verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = SessionManager::new("test-secret", -2);
        let token = manager.issue(&account()).unwrap();
        assert!(manager.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let manager = SessionManager::new("test-secret", 24);
        assert!(manager.verify("not.a.token").is_err());
    }
}
