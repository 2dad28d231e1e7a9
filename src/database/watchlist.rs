// ABOUTME: Student watchlist (saved courses) with idempotent add and remove
// ABOUTME: Membership is keyed by (student_id, course_id)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::Row;
use tracing::debug;

use super::{course_card_from_row, now_rfc3339, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::WatchlistEntry;

impl Database {
    /// Save a course; saving twice keeps a single entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course does not exist
    pub async fn add_to_watchlist(&self, student_id: i64, course_id: i64) -> AppResult<()> {
        if self.get_course(course_id).await?.is_none() {
            return Err(AppError::not_found("Course"));
        }
        sqlx::query(
            r"
            INSERT INTO watchlist (student_id, course_id, added_at) VALUES ($1, $2, $3)
            ON CONFLICT (student_id, course_id) DO NOTHING
            ",
        )
        .bind(student_id)
        .bind(course_id)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add to watchlist: {e}")))?;
        debug!(student_id, course_id, "Added to watchlist");
        Ok(())
    }

    /// Remove a saved course; returns whether an entry was removed
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove_from_watchlist(&self, student_id: i64, course_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watchlist WHERE student_id = $1 AND course_id = $2")
            .bind(student_id)
            .bind(course_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove from watchlist: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the course is saved
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_in_watchlist(&self, student_id: i64, course_id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM watchlist WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check watchlist: {e}")))?;
        Ok(found.is_some())
    }

    /// Saved courses, most recently saved first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_watchlist(&self, student_id: i64) -> AppResult<Vec<WatchlistEntry>> {
        let rows = sqlx::query(
            r"
            SELECT
                c.course_id, c.title, c.description, c.image_url,
                c.current_price, c.original_price, c.student_count, c.view_count,
                c.star, c.is_bestseller, c.status, c.total_hours, c.total_lectures,
                c.created_at,
                i.name AS instructor_name,
                cat.name AS category_name,
                w.added_at
            FROM watchlist w
            JOIN courses c ON c.course_id = w.course_id
            LEFT JOIN instructors i ON c.instructor_id = i.instructor_id
            LEFT JOIN categories cat ON c.category_id = cat.category_id
            WHERE w.student_id = $1
            ORDER BY w.added_at DESC
            ",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list watchlist: {e}")))?;

        rows.iter()
            .map(|row| {
                let added_at: String = row.get("added_at");
                Ok(WatchlistEntry {
                    course: course_card_from_row(row)?,
                    added_at: parse_timestamp(&added_at)?,
                })
            })
            .collect()
    }
}
