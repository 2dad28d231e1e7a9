// ABOUTME: Student profile lookups keyed by account or student id
// ABOUTME: Resolves the student row behind a logged-in account
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::Student;

fn student_from_row(row: &SqliteRow) -> AppResult<Student> {
    let created_at: String = row.get("created_at");
    Ok(Student {
        student_id: row.get("student_id"),
        account_id: row.get("account_id"),
        name: row.get("name"),
        created_at: parse_timestamp(&created_at)?,
    })
}

impl Database {
    /// Get the student profile owned by an account
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_student_by_account(&self, account_id: i64) -> AppResult<Option<Student>> {
        let row = sqlx::query("SELECT * FROM students WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get student: {e}")))?;
        row.as_ref().map(student_from_row).transpose()
    }

    /// Get a student by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_student(&self, student_id: i64) -> AppResult<Option<Student>> {
        let row = sqlx::query("SELECT * FROM students WHERE student_id = $1")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get student: {e}")))?;
        row.as_ref().map(student_from_row).transpose()
    }

    /// Student id for an account, failing when the account has no student profile
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the account is not a student
    pub async fn require_student_id(&self, account_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT student_id FROM students WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get student: {e}")))?
            .ok_or_else(|| AppError::permission_denied("Only students can do this"))
    }
}
