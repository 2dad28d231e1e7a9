// ABOUTME: Password policy, bcrypt hashing and verification off the async executor
// ABOUTME: One-time code generation and SHA-256 hashing for email verification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::task;

use crate::constants::{accounts, otp};
use crate::errors::{AppError, AppResult};

/// Check the password policy: minimum length, at least one letter and one digit
///
/// # Errors
///
/// Returns `InvalidInput` describing the first rule that fails
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < accounts::MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {} characters",
            accounts::MIN_PASSWORD_LENGTH
        )));
    }
    if !password.chars().any(char::is_alphabetic) || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(AppError::invalid_input(
            "Password must contain at least one letter and one digit",
        ));
    }
    Ok(())
}

/// Hash a password with bcrypt on a blocking task
///
/// # Errors
///
/// Returns an error if hashing fails
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    task::spawn_blocking(move || hash(&password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a bcrypt hash on a blocking task
///
/// An empty or malformed hash (OAuth-only accounts) never verifies.
///
/// # Errors
///
/// Returns an error if the blocking task fails
pub async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    if password_hash.is_empty() {
        return Ok(false);
    }
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let result = task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?;
    Ok(result.unwrap_or(false))
}

/// Random numeric one-time code
#[must_use]
pub fn generate_otp_code() -> String {
    let max = 10_u32.pow(otp::CODE_LENGTH as u32);
    let code = rand::thread_rng().gen_range(0..max);
    format!("{code:0width$}", width = otp::CODE_LENGTH)
}

/// SHA-256 hex digest of a code, the form stored in the database
#[must_use]
pub fn hash_otp_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.trim().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("short1").is_err());
        assert!(validate_password("allletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password("learn2code").is_ok());
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hashed = hash_password("learn2code").await.unwrap();
        assert!(verify_password("learn2code", &hashed).await.unwrap());
        assert!(!verify_password("wrong-pass1", &hashed).await.unwrap());
        assert!(!verify_password("learn2code", "").await.unwrap());
    }

    #[test]
    fn test_otp_code_shape() {
        for _ in 0..50 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_otp_hash_is_stable_and_trimmed() {
        assert_eq!(hash_otp_code("123456"), hash_otp_code(" 123456 "));
        assert_ne!(hash_otp_code("123456"), hash_otp_code("654321"));
        assert_eq!(hash_otp_code("123456").len(), 64);
    }
}
