// ABOUTME: Instructor profile operations and instructor dashboard statistics
// ABOUTME: Lists an instructor's own courses and aggregates lecture and student totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{course_card_from_row, parse_timestamp, Database, COURSE_CARD_SELECT};
use crate::errors::{AppError, AppResult};
use crate::models::{CourseCard, Instructor, InstructorStats};

pub(crate) fn instructor_from_row(row: &SqliteRow) -> AppResult<Instructor> {
    let created_at: String = row.get("created_at");
    Ok(Instructor {
        instructor_id: row.get("instructor_id"),
        account_id: row.get("account_id"),
        name: row.get("name"),
        bio: row.get("bio"),
        total_students: row.get("total_students"),
        created_at: parse_timestamp(&created_at)?,
    })
}

impl Database {
    /// Get the instructor profile owned by an account
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_instructor_by_account(&self, account_id: i64) -> AppResult<Option<Instructor>> {
        let row = sqlx::query("SELECT * FROM instructors WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get instructor: {e}")))?;
        row.as_ref().map(instructor_from_row).transpose()
    }

    /// Get an instructor by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_instructor(&self, instructor_id: i64) -> AppResult<Option<Instructor>> {
        let row = sqlx::query("SELECT * FROM instructors WHERE instructor_id = $1")
            .bind(instructor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get instructor: {e}")))?;
        row.as_ref().map(instructor_from_row).transpose()
    }

    /// Update the public instructor profile, mirroring the name onto the account
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the instructor does not exist
    pub async fn update_instructor_profile(
        &self,
        instructor_id: i64,
        name: &str,
        bio: Option<&str>,
    ) -> AppResult<()> {
        let mut guard = self.begin().await?;

        let account_id: i64 = sqlx::query_scalar(
            "UPDATE instructors SET name = $1, bio = $2 WHERE instructor_id = $3 RETURNING account_id",
        )
        .bind(name)
        .bind(bio)
        .bind(instructor_id)
        .fetch_optional(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update instructor: {e}")))?
        .ok_or_else(|| AppError::not_found("Instructor"))?;

        sqlx::query("UPDATE accounts SET full_name = $1 WHERE account_id = $2")
            .bind(name)
            .bind(account_id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update account name: {e}")))?;

        guard.commit().await
    }

    /// Courses authored by an instructor, newest first (all statuses)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_instructor_courses(&self, instructor_id: i64) -> AppResult<Vec<CourseCard>> {
        let sql = format!(
            "{COURSE_CARD_SELECT} WHERE c.instructor_id = $1 ORDER BY c.created_at DESC, c.course_id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(instructor_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list instructor courses: {e}")))?;
        rows.iter().map(course_card_from_row).collect()
    }

    /// Overview numbers for the instructor home page
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn instructor_stats(&self, instructor_id: i64) -> AppResult<InstructorStats> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total_courses,
                COALESCE(SUM(CASE WHEN status IN ('complete', 'active') THEN 1 ELSE 0 END), 0)
                    AS completed_courses,
                COALESCE(SUM(total_lectures), 0) AS total_lectures,
                COALESCE(SUM(student_count), 0) AS total_students
            FROM courses
            WHERE instructor_id = $1
            ",
        )
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to compute instructor stats: {e}")))?;

        Ok(InstructorStats {
            total_courses: row.get("total_courses"),
            completed_courses: row.get("completed_courses"),
            total_lectures: row.get("total_lectures"),
            total_students: row.get("total_students"),
        })
    }
}
