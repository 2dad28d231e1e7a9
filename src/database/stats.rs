// ABOUTME: Admin dashboard counters and user listings
// ABOUTME: Joins accounts with their student or instructor profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::Row;

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{AdminCounts, Role, UserSummary};

impl Database {
    /// Totals shown on the admin dashboard
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn admin_counts(&self) -> AppResult<AdminCounts> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM categories) AS categories,
                (SELECT COUNT(*) FROM courses) AS courses,
                (SELECT COUNT(*) FROM instructors) AS instructors,
                (SELECT COUNT(*) FROM students) AS students
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count dashboard totals: {e}")))?;

        Ok(AdminCounts {
            categories: row.get("categories"),
            courses: row.get("courses"),
            instructors: row.get("instructors"),
            students: row.get("students"),
        })
    }

    /// Accounts with a given role, newest first
    ///
    /// `course_count` is courses taught for instructors and courses enrolled
    /// for students.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(&self, role: Role) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query(
            r"
            SELECT
                a.account_id, a.email, a.full_name, a.role, a.is_verified, a.created_at,
                CASE a.role
                    WHEN 'instructor' THEN (
                        SELECT COUNT(*) FROM courses c
                        JOIN instructors i ON c.instructor_id = i.instructor_id
                        WHERE i.account_id = a.account_id
                    )
                    WHEN 'student' THEN (
                        SELECT COUNT(*) FROM enrollments e
                        JOIN students s ON e.student_id = s.student_id
                        WHERE s.account_id = a.account_id
                    )
                    ELSE 0
                END AS course_count
            FROM accounts a
            WHERE a.role = $1
            ORDER BY a.created_at DESC, a.account_id DESC
            ",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        rows.iter()
            .map(|row| {
                let role: String = row.get("role");
                let created_at: String = row.get("created_at");
                Ok(UserSummary {
                    account_id: row.get("account_id"),
                    email: row.get("email"),
                    full_name: row.get("full_name"),
                    role: Role::parse(&role)?,
                    is_verified: row.get("is_verified"),
                    course_count: row.get("course_count"),
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }
}
