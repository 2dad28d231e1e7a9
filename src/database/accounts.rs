// ABOUTME: Account database operations for registration, login and profile edits
// ABOUTME: Creates accounts together with their student or instructor row in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{now_rfc3339, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Account, AuthProvider, Role};

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Email, normalized by the caller
    pub email: String,
    /// bcrypt hash, empty for OAuth-only accounts
    pub password_hash: String,
    /// Display name
    pub full_name: String,
    /// Skip OTP verification
    pub is_verified: bool,
    /// Profile picture
    pub avatar_url: Option<String>,
    /// Sign-in method
    pub auth_provider: AuthProvider,
}

/// Lower-case and trim an email address
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn account_from_row(row: &SqliteRow) -> AppResult<Account> {
    let role: String = row.get("role");
    let provider: String = row.get("auth_provider");
    let created_at: String = row.get("created_at");
    Ok(Account {
        account_id: row.get("account_id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        role: Role::parse(&role)?,
        is_verified: row.get("is_verified"),
        avatar_url: row.get("avatar_url"),
        auth_provider: AuthProvider::parse(&provider),
        created_at: parse_timestamp(&created_at)?,
    })
}

impl Database {
    /// Create a student account and its student profile atomically
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email is taken, or a database error
    pub async fn create_student_account(&self, account: &NewAccount) -> AppResult<Account> {
        self.create_account_with_profile(account, Role::Student, None)
            .await
    }

    /// Create a pre-verified instructor account and its instructor profile atomically
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email is taken, or a database error
    pub async fn create_instructor_account(
        &self,
        account: &NewAccount,
        bio: Option<&str>,
    ) -> AppResult<Account> {
        self.create_account_with_profile(account, Role::Instructor, bio)
            .await
    }

    /// Create an administrator account (no profile row)
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email is taken, or a database error
    pub async fn create_admin_account(&self, account: &NewAccount) -> AppResult<Account> {
        self.create_account_with_profile(account, Role::Admin, None)
            .await
    }

    async fn create_account_with_profile(
        &self,
        account: &NewAccount,
        role: Role,
        bio: Option<&str>,
    ) -> AppResult<Account> {
        let now = now_rfc3339();
        let email = normalize_email(&account.email);

        let mut guard = self.begin().await?;

        let account_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO accounts (
                email, password_hash, full_name, role, is_verified,
                avatar_url, auth_provider, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING account_id
            ",
        )
        .bind(&email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(role.as_str())
        .bind(account.is_verified)
        .bind(&account.avatar_url)
        .bind(account.auth_provider.as_str())
        .bind(&now)
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to create account", &e))?;

        match role {
            Role::Student => {
                sqlx::query(
                    "INSERT INTO students (account_id, name, created_at) VALUES ($1, $2, $3)",
                )
                .bind(account_id)
                .bind(&account.full_name)
                .bind(&now)
                .execute(guard.executor()?)
                .await
                .map_err(|e| AppError::from_sqlx("Failed to create student profile", &e))?;
            }
            Role::Instructor => {
                sqlx::query(
                    r"
                    INSERT INTO instructors (account_id, name, bio, total_students, created_at)
                    VALUES ($1, $2, $3, 0, $4)
                    ",
                )
                .bind(account_id)
                .bind(&account.full_name)
                .bind(bio)
                .bind(&now)
                .execute(guard.executor()?)
                .await
                .map_err(|e| AppError::from_sqlx("Failed to create instructor profile", &e))?;
            }
            Role::Admin => {}
        }

        guard.commit().await?;
        info!(account_id, role = role.as_str(), "Account created");

        self.get_account(account_id)
            .await?
            .ok_or_else(|| AppError::internal("Account vanished after creation"))
    }

    /// Get an account by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_account(&self, account_id: i64) -> AppResult<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get account: {e}")))?;
        row.as_ref().map(account_from_row).transpose()
    }

    /// Get an account by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let row = sqlx::query("SELECT * FROM accounts WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get account by email: {e}")))?;
        row.as_ref().map(account_from_row).transpose()
    }

    /// Mark the account's email as confirmed
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the account does not exist
    pub async fn mark_account_verified(&self, account_id: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE accounts SET is_verified = 1 WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to verify account: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Account"));
        }
        Ok(())
    }

    /// Hand an unverified account over to a verified external identity
    ///
    /// The stored password and any pending codes are discarded.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the account does not exist or is already verified
    pub async fn claim_unverified_account(
        &self,
        account_id: i64,
        provider: AuthProvider,
    ) -> AppResult<()> {
        let mut guard = self.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE accounts SET is_verified = 1, password_hash = '', auth_provider = $1
            WHERE account_id = $2 AND is_verified = 0
            ",
        )
        .bind(provider.as_str())
        .bind(account_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to claim account: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Unverified account"));
        }

        sqlx::query(
            "UPDATE account_otps SET consumed_at = $1 WHERE account_id = $2 AND consumed_at IS NULL",
        )
        .bind(now_rfc3339())
        .bind(account_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to revoke pending codes: {e}")))?;

        guard.commit().await?;
        info!(account_id, provider = provider.as_str(), "Unverified account claimed");
        Ok(())
    }

    /// Update display name and avatar, keeping the profile row's name in sync
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the account does not exist
    pub async fn update_account_profile(
        &self,
        account_id: i64,
        full_name: &str,
        avatar_url: Option<&str>,
    ) -> AppResult<()> {
        let mut guard = self.begin().await?;

        let result = sqlx::query(
            "UPDATE accounts SET full_name = $1, avatar_url = $2 WHERE account_id = $3",
        )
        .bind(full_name)
        .bind(avatar_url)
        .bind(account_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update account: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Account"));
        }

        sqlx::query("UPDATE students SET name = $1 WHERE account_id = $2")
            .bind(full_name)
            .bind(account_id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update student name: {e}")))?;

        sqlx::query("UPDATE instructors SET name = $1 WHERE account_id = $2")
            .bind(full_name)
            .bind(account_id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update instructor name: {e}")))?;

        guard.commit().await
    }

    /// Replace the password hash
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the account does not exist
    pub async fn update_password_hash(&self, account_id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $1 WHERE account_id = $2")
            .bind(password_hash)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Account"));
        }
        Ok(())
    }

    /// Replace the email address
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if another account uses the address
    pub async fn update_account_email(&self, account_id: i64, email: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE accounts SET email = $1 WHERE account_id = $2")
            .bind(normalize_email(email))
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx("Failed to update email", &e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Account"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
