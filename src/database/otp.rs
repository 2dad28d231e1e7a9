// ABOUTME: One-time password storage with expiry, attempt counting and single use
// ABOUTME: Codes are stored as SHA-256 hashes and compared in constant time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{now_rfc3339, parse_timestamp, Database};
use crate::constants::otp;
use crate::errors::{AppError, AppResult};
use crate::models::OtpPurpose;

/// A code that verified successfully
#[derive(Debug, Clone)]
pub struct VerifiedOtp {
    /// Primary key
    pub otp_id: i64,
    /// Owning account
    pub account_id: i64,
    /// Address being confirmed, for email changes
    pub new_email: Option<String>,
}

impl Database {
    /// Store a new code, invalidating earlier unused codes of the same purpose
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_otp(
        &self,
        account_id: i64,
        purpose: OtpPurpose,
        code_hash: &str,
        new_email: Option<&str>,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(otp::TTL_MINUTES);

        let mut guard = self.begin().await?;

        sqlx::query(
            r"
            UPDATE account_otps SET consumed_at = $1
            WHERE account_id = $2 AND purpose = $3 AND consumed_at IS NULL
            ",
        )
        .bind(now.to_rfc3339())
        .bind(account_id)
        .bind(purpose.as_str())
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to invalidate old codes: {e}")))?;

        let otp_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO account_otps (
                account_id, purpose, code_hash, new_email, attempts, expires_at, created_at
            ) VALUES ($1, $2, $3, $4, 0, $5, $6)
            RETURNING otp_id
            ",
        )
        .bind(account_id)
        .bind(purpose.as_str())
        .bind(code_hash)
        .bind(new_email)
        .bind(expires_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to store code: {e}")))?;

        guard.commit().await?;
        debug!(account_id, purpose = purpose.as_str(), "Issued one-time code");
        Ok(otp_id)
    }

    /// Check a submitted code against the account's active code
    ///
    /// A wrong guess counts against the attempt limit; a correct one consumes
    /// the code so it cannot be replayed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when there is no active code, the code expired,
    /// the attempt limit was reached, or the code does not match
    pub async fn verify_otp(
        &self,
        account_id: i64,
        purpose: OtpPurpose,
        code_hash: &str,
    ) -> AppResult<VerifiedOtp> {
        self.verify_otp_at(account_id, purpose, code_hash, Utc::now())
            .await
    }

    pub(crate) async fn verify_otp_at(
        &self,
        account_id: i64,
        purpose: OtpPurpose,
        code_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<VerifiedOtp> {
        let row = sqlx::query(
            r"
            SELECT otp_id, code_hash, new_email, attempts, expires_at
            FROM account_otps
            WHERE account_id = $1 AND purpose = $2 AND consumed_at IS NULL
            ORDER BY otp_id DESC
            LIMIT 1
            ",
        )
        .bind(account_id)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load code: {e}")))?
        .ok_or_else(|| AppError::invalid_input("No pending code. Please request a new one."))?;

        let otp_id: i64 = row.get("otp_id");
        let stored_hash: String = row.get("code_hash");
        let attempts: i64 = row.get("attempts");
        let expires_at: String = row.get("expires_at");

        if parse_timestamp(&expires_at)? <= now {
            return Err(AppError::invalid_input(
                "The code has expired. Please request a new one.",
            ));
        }
        if attempts >= otp::MAX_ATTEMPTS {
            return Err(AppError::invalid_input(
                "Too many attempts. Please request a new code.",
            ));
        }

        let matches: bool = stored_hash.as_bytes().ct_eq(code_hash.as_bytes()).into();
        if !matches {
            sqlx::query("UPDATE account_otps SET attempts = attempts + 1 WHERE otp_id = $1")
                .bind(otp_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count attempt: {e}")))?;
            warn!(account_id, attempts = attempts + 1, "Wrong one-time code");
            return Err(AppError::invalid_input("The code is incorrect."));
        }

        // Guard on consumed_at so two concurrent submissions cannot both win
        let result = sqlx::query(
            "UPDATE account_otps SET consumed_at = $1 WHERE otp_id = $2 AND consumed_at IS NULL",
        )
        .bind(now_rfc3339())
        .bind(otp_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to consume code: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::invalid_input(
                "No pending code. Please request a new one.",
            ));
        }

        Ok(VerifiedOtp {
            otp_id,
            account_id,
            new_email: row.get("new_email"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::accounts::NewAccount;
    use crate::models::AuthProvider;

    async fn account(db: &Database) -> i64 {
        db.create_student_account(&NewAccount {
            email: "otp@example.com".to_owned(),
            password_hash: String::new(),
            full_name: "Otp Tester".to_owned(),
            is_verified: false,
            avatar_url: None,
            auth_provider: AuthProvider::Email,
        })
        .await
        .unwrap()
        .account_id
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let account_id = account(&db).await;
        db.create_otp(account_id, OtpPurpose::Register, "hash", None)
            .await
            .unwrap();

        let later = Utc::now() + Duration::minutes(otp::TTL_MINUTES + 1);
        let err = db
            .verify_otp_at(account_id, OtpPurpose::Register, "hash", later)
            .await
            .unwrap_err();
        assert!(err.public_message().contains("expired"));
    }

    #[tokio::test]
    async fn test_code_valid_just_before_expiry() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let account_id = account(&db).await;
        db.create_otp(account_id, OtpPurpose::Register, "hash", None)
            .await
            .unwrap();

        let almost = Utc::now() + Duration::minutes(otp::TTL_MINUTES) - Duration::seconds(5);
        let verified = db
            .verify_otp_at(account_id, OtpPurpose::Register, "hash", almost)
            .await
            .unwrap();
        assert_eq!(verified.account_id, account_id);
    }
}
