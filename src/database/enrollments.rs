// ABOUTME: Student enrollment with duplicate rejection and counter maintenance
// ABOUTME: Lists a student's enrolled courses with progress and watchlist flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{course_card_from_row, now_rfc3339, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{CourseStatus, EnrolledCourse, Enrollment};

pub(crate) fn progress_from_db(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

fn enrollment_from_row(row: &SqliteRow) -> AppResult<Enrollment> {
    let enrolled_at: String = row.get("enrolled_at");
    Ok(Enrollment {
        enrollment_id: row.get("enrollment_id"),
        student_id: row.get("student_id"),
        course_id: row.get("course_id"),
        progress: progress_from_db(row.get("progress")),
        enrolled_at: parse_timestamp(&enrolled_at)?,
    })
}

impl Database {
    /// Enroll a student in a listed course
    ///
    /// Inserts the enrollment with progress 0 and bumps the course's
    /// `student_count` and the instructor's `total_students` in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ResourceNotFound` if the course does not exist or is suspended
    /// - `ResourceAlreadyExists` if the student is already enrolled
    #[tracing::instrument(skip(self), fields(operation = "enroll"))]
    pub async fn enroll(&self, student_id: i64, course_id: i64) -> AppResult<Enrollment> {
        let mut guard = self.begin().await?;

        let course = sqlx::query("SELECT instructor_id, status FROM courses WHERE course_id = $1")
            .bind(course_id)
            .fetch_optional(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to load course: {e}")))?
            .ok_or_else(|| AppError::not_found("Course"))?;
        let instructor_id: i64 = course.get("instructor_id");
        let status: String = course.get("status");
        if !CourseStatus::parse(&status)?.is_listed() {
            return Err(AppError::not_found("Course"));
        }

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT enrollment_id FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to check enrollment: {e}")))?;
        if existing.is_some() {
            return Err(AppError::already_exists(
                "You are already enrolled in this course",
            ));
        }

        let row = sqlx::query(
            r"
            INSERT INTO enrollments (student_id, course_id, progress, enrolled_at)
            VALUES ($1, $2, 0, $3)
            RETURNING *
            ",
        )
        .bind(student_id)
        .bind(course_id)
        .bind(now_rfc3339())
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to enroll", &e))?;
        let enrollment = enrollment_from_row(&row)?;

        sqlx::query("UPDATE courses SET student_count = student_count + 1 WHERE course_id = $1")
            .bind(course_id)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update course counter: {e}")))?;

        sqlx::query(
            "UPDATE instructors SET total_students = total_students + 1 WHERE instructor_id = $1",
        )
        .bind(instructor_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update instructor counter: {e}")))?;

        guard.commit().await?;
        info!(student_id, course_id, "Student enrolled");
        Ok(enrollment)
    }

    /// Whether the student is enrolled in the course
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_enrolled(&self, student_id: i64, course_id: i64) -> AppResult<bool> {
        Ok(self.get_enrollment(student_id, course_id).await?.is_some())
    }

    /// Get the enrollment row for a student and course
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> AppResult<Option<Enrollment>> {
        let row = sqlx::query("SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2")
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get enrollment: {e}")))?;
        row.as_ref().map(enrollment_from_row).transpose()
    }

    /// A student's courses, most recent enrollment first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_enrollments_for_student(
        &self,
        student_id: i64,
    ) -> AppResult<Vec<EnrolledCourse>> {
        let rows = sqlx::query(
            r"
            SELECT
                c.course_id, c.title, c.description, c.image_url,
                c.current_price, c.original_price, c.student_count, c.view_count,
                c.star, c.is_bestseller, c.status, c.total_hours, c.total_lectures,
                c.created_at,
                i.name AS instructor_name,
                cat.name AS category_name,
                e.progress,
                e.enrolled_at,
                EXISTS (
                    SELECT 1 FROM watchlist w
                    WHERE w.student_id = e.student_id AND w.course_id = e.course_id
                ) AS in_watchlist
            FROM enrollments e
            JOIN courses c ON c.course_id = e.course_id
            LEFT JOIN instructors i ON c.instructor_id = i.instructor_id
            LEFT JOIN categories cat ON c.category_id = cat.category_id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_at DESC, e.enrollment_id DESC
            ",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list enrollments: {e}")))?;

        rows.iter()
            .map(|row| {
                let enrolled_at: String = row.get("enrolled_at");
                Ok(EnrolledCourse {
                    course: course_card_from_row(row)?,
                    progress: progress_from_db(row.get("progress")),
                    enrolled_at: parse_timestamp(&enrolled_at)?,
                    in_watchlist: row.get("in_watchlist"),
                })
            })
            .collect()
    }
}
