// ABOUTME: Course reviews with one review per student and course
// ABOUTME: Upserts recompute the course star average in the same transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{now_rfc3339, parse_timestamp, Database};
use crate::constants::reviews;
use crate::errors::{AppError, AppResult};
use crate::models::Review;

const REVIEW_SELECT: &str = r"
    SELECT r.review_id, r.student_id, r.course_id, r.rating, r.feedback, r.created_at,
           s.name AS student_name, c.title AS course_title
    FROM reviews r
    JOIN students s ON r.student_id = s.student_id
    JOIN courses c ON r.course_id = c.course_id
";

fn review_from_row(row: &SqliteRow) -> AppResult<Review> {
    let created_at: String = row.get("created_at");
    Ok(Review {
        review_id: row.get("review_id"),
        student_id: row.get("student_id"),
        course_id: row.get("course_id"),
        rating: row.get("rating"),
        feedback: row.get("feedback"),
        created_at: parse_timestamp(&created_at)?,
        student_name: row.get("student_name"),
        course_title: row.get("course_title"),
    })
}

/// Check rating range and feedback text, returning the trimmed feedback
///
/// # Errors
///
/// Returns `InvalidInput` for an out-of-range rating or empty/oversized feedback
pub fn validate_review(rating: i64, feedback: &str) -> AppResult<&str> {
    if !(reviews::MIN_RATING..=reviews::MAX_RATING).contains(&rating) {
        return Err(AppError::invalid_input(format!(
            "Rating must be between {} and {}",
            reviews::MIN_RATING,
            reviews::MAX_RATING
        )));
    }
    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Err(AppError::invalid_input("Please write a few words of feedback"));
    }
    if feedback.chars().count() > reviews::MAX_FEEDBACK_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Feedback must be at most {} characters",
            reviews::MAX_FEEDBACK_LENGTH
        )));
    }
    Ok(feedback)
}

impl Database {
    /// Create or replace a student's review of a course
    ///
    /// The student must be enrolled. The course's `star` becomes the average
    /// of all its ratings, written in the same transaction as the review.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad rating or feedback, `PermissionDenied`
    /// if the student is not enrolled
    #[tracing::instrument(skip(self, feedback), fields(operation = "upsert_review"))]
    pub async fn upsert_review(
        &self,
        student_id: i64,
        course_id: i64,
        rating: i64,
        feedback: &str,
    ) -> AppResult<Review> {
        let feedback = validate_review(rating, feedback)?;

        let mut guard = self.begin().await?;

        let enrolled: Option<i64> = sqlx::query_scalar(
            "SELECT enrollment_id FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to check enrollment: {e}")))?;
        if enrolled.is_none() {
            return Err(AppError::permission_denied(
                "Only enrolled students can review this course",
            ));
        }

        sqlx::query(
            r"
            INSERT INTO reviews (student_id, course_id, rating, feedback, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, course_id)
            DO UPDATE SET rating = excluded.rating,
                          feedback = excluded.feedback,
                          created_at = excluded.created_at
            ",
        )
        .bind(student_id)
        .bind(course_id)
        .bind(rating)
        .bind(feedback)
        .bind(now_rfc3339())
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to save review: {e}")))?;

        sqlx::query(
            r"
            UPDATE courses SET star = (
                SELECT COALESCE(ROUND(AVG(rating), 1), 0.0) FROM reviews WHERE course_id = $1
            )
            WHERE course_id = $1
            ",
        )
        .bind(course_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update course rating: {e}")))?;

        guard.commit().await?;
        info!(student_id, course_id, rating, "Review saved");

        self.get_review(student_id, course_id)
            .await?
            .ok_or_else(|| AppError::internal("Review vanished after save"))
    }

    /// The review a student wrote for a course, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_review(&self, student_id: i64, course_id: i64) -> AppResult<Option<Review>> {
        let sql = format!("{REVIEW_SELECT} WHERE r.student_id = $1 AND r.course_id = $2");
        let row = sqlx::query(&sql)
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get review: {e}")))?;
        row.as_ref().map(review_from_row).transpose()
    }

    /// Reviews of a course, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_reviews_for_course(&self, course_id: i64) -> AppResult<Vec<Review>> {
        let sql = format!(
            "{REVIEW_SELECT} WHERE r.course_id = $1 ORDER BY r.created_at DESC, r.review_id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list reviews: {e}")))?;
        rows.iter().map(review_from_row).collect()
    }

    /// Reviews written by a student, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_reviews_by_student(&self, student_id: i64) -> AppResult<Vec<Review>> {
        let sql = format!(
            "{REVIEW_SELECT} WHERE r.student_id = $1 ORDER BY r.created_at DESC, r.review_id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list reviews: {e}")))?;
        rows.iter().map(review_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_review() {
        assert_eq!(validate_review(5, "  Great course ").unwrap(), "Great course");
        assert!(validate_review(0, "ok").is_err());
        assert!(validate_review(6, "ok").is_err());
        assert!(validate_review(3, "   ").is_err());
        assert!(validate_review(3, &"x".repeat(2001)).is_err());
    }
}
