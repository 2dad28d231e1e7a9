// ABOUTME: Per-lecture completion tracking and the course progress rollup
// ABOUTME: Progress is round(100 * distinct completed / total lectures), recomputed in a transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::SqliteConnection;
use tracing::debug;

use super::{now_rfc3339, Database};
use crate::errors::{AppError, AppResult};

/// Percentage of `total` lectures covered by `completed`, rounded half up
///
/// Always in `0..=100`; a course without lectures has progress 0.
#[must_use]
pub fn compute_progress(completed: i64, total: i64) -> u8 {
    if total <= 0 {
        return 0;
    }
    let completed = completed.clamp(0, total);
    ((200 * completed + total) / (2 * total)) as u8
}

async fn upsert_completion(
    conn: &mut SqliteConnection,
    student_id: i64,
    lecture_id: i64,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO lecture_progress (student_id, lecture_id, is_completed, last_watched_at)
        VALUES ($1, $2, 1, $3)
        ON CONFLICT (student_id, lecture_id)
        DO UPDATE SET is_completed = 1, last_watched_at = excluded.last_watched_at
        ",
    )
    .bind(student_id)
    .bind(lecture_id)
    .bind(now_rfc3339())
    .execute(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to mark lecture complete: {e}")))?;
    Ok(())
}

async fn rollup(conn: &mut SqliteConnection, student_id: i64, course_id: i64) -> AppResult<u8> {
    let total: i64 = sqlx::query_scalar(
        r"
        SELECT COUNT(*) FROM lectures l
        JOIN course_sections s ON l.section_id = s.section_id
        WHERE s.course_id = $1
        ",
    )
    .bind(course_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to count lectures: {e}")))?;

    let completed: i64 = if total == 0 {
        0
    } else {
        sqlx::query_scalar(
            r"
            SELECT COUNT(DISTINCT lp.lecture_id) FROM lecture_progress lp
            JOIN lectures l ON lp.lecture_id = l.lecture_id
            JOIN course_sections s ON l.section_id = s.section_id
            WHERE lp.student_id = $1 AND s.course_id = $2 AND lp.is_completed = 1
            ",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to count completed lectures: {e}")))?
    };

    let progress = compute_progress(completed, total);

    let result = sqlx::query(
        "UPDATE enrollments SET progress = $1 WHERE student_id = $2 AND course_id = $3",
    )
    .bind(i64::from(progress))
    .bind(student_id)
    .bind(course_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to update progress: {e}")))?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Enrollment"));
    }

    debug!(student_id, course_id, completed, total, progress, "Progress rolled up");
    Ok(progress)
}

impl Database {
    /// Record that a student finished a lecture (idempotent upsert)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn mark_lecture_complete(&self, student_id: i64, lecture_id: i64) -> AppResult<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        upsert_completion(&mut conn, student_id, lecture_id).await
    }

    /// Recompute and store a student's progress in a course
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the student is not enrolled
    pub async fn update_course_progress(&self, student_id: i64, course_id: i64) -> AppResult<u8> {
        let mut guard = self.begin().await?;
        let progress = rollup(guard.executor()?, student_id, course_id).await?;
        guard.commit().await?;
        Ok(progress)
    }

    /// Mark a lecture complete and roll up progress in one transaction
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ResourceNotFound` if the lecture is not part of the course
    /// - `PermissionDenied` if the student is not enrolled
    #[tracing::instrument(skip(self), fields(operation = "complete_lecture"))]
    pub async fn complete_lecture(
        &self,
        student_id: i64,
        course_id: i64,
        lecture_id: i64,
    ) -> AppResult<u8> {
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
                "Enroll in the course to track progress",
            ));
        }

        let in_course: Option<i64> = sqlx::query_scalar(
            r"
            SELECT l.lecture_id FROM lectures l
            JOIN course_sections s ON l.section_id = s.section_id
            WHERE l.lecture_id = $1 AND s.course_id = $2
            ",
        )
        .bind(lecture_id)
        .bind(course_id)
        .fetch_optional(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to check lecture: {e}")))?;
        if in_course.is_none() {
            return Err(AppError::not_found("Lecture"));
        }

        upsert_completion(guard.executor()?, student_id, lecture_id).await?;
        let progress = rollup(guard.executor()?, student_id, course_id).await?;

        guard.commit().await?;
        Ok(progress)
    }

    /// Lecture ids of a course the student has completed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn completed_lecture_ids(&self, student_id: i64, course_id: i64) -> AppResult<Vec<i64>> {
        sqlx::query_scalar(
            r"
            SELECT lp.lecture_id FROM lecture_progress lp
            JOIN lectures l ON lp.lecture_id = l.lecture_id
            JOIN course_sections s ON l.section_id = s.section_id
            WHERE lp.student_id = $1 AND s.course_id = $2 AND lp.is_completed = 1
            ORDER BY lp.lecture_id
            ",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load completed lectures: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_progress_bounds() {
        assert_eq!(compute_progress(0, 0), 0);
        assert_eq!(compute_progress(5, 0), 0);
        assert_eq!(compute_progress(0, 6), 0);
        assert_eq!(compute_progress(6, 6), 100);
        assert_eq!(compute_progress(9, 6), 100);
        assert_eq!(compute_progress(-2, 6), 0);
    }

    #[test]
    fn test_compute_progress_rounds_half_up() {
        assert_eq!(compute_progress(3, 6), 50);
        assert_eq!(compute_progress(1, 3), 33);
        assert_eq!(compute_progress(2, 3), 67);
        assert_eq!(compute_progress(1, 8), 13);
        assert_eq!(compute_progress(1, 200), 1);
        assert_eq!(compute_progress(1, 201), 0);
    }
}
