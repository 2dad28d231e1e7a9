// ABOUTME: Course sections and lectures, ordered for the detail and learning pages
// ABOUTME: Adding a lecture recomputes the course's lecture count and total hours
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{now_rfc3339, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Lecture, Section};

/// Fields for a new lecture
#[derive(Debug, Clone)]
pub struct LectureInput {
    /// Title
    pub title: String,
    /// Video location
    pub video_url: Option<String>,
    /// Length in seconds
    pub duration_seconds: i64,
    /// Watchable without enrolling
    pub is_preview: bool,
}

fn lecture_from_row(row: &SqliteRow) -> Lecture {
    Lecture {
        lecture_id: row.get("lecture_id"),
        section_id: row.get("section_id"),
        title: row.get("title"),
        video_url: row.get("video_url"),
        duration_seconds: row.get("duration_seconds"),
        is_preview: row.get("is_preview"),
        order_index: row.get("order_index"),
    }
}

impl Database {
    /// Sections of a course in order, each with its ordered lectures
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_sections(&self, course_id: i64) -> AppResult<Vec<Section>> {
        let section_rows = sqlx::query(
            r"
            SELECT section_id, course_id, title, order_index
            FROM course_sections
            WHERE course_id = $1
            ORDER BY order_index ASC, section_id ASC
            ",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load sections: {e}")))?;

        let lecture_rows = sqlx::query(
            r"
            SELECT l.* FROM lectures l
            JOIN course_sections s ON l.section_id = s.section_id
            WHERE s.course_id = $1
            ORDER BY s.order_index ASC, l.order_index ASC, l.lecture_id ASC
            ",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load lectures: {e}")))?;
        let lectures: Vec<Lecture> = lecture_rows.iter().map(lecture_from_row).collect();

        Ok(section_rows
            .iter()
            .map(|row| {
                let section_id: i64 = row.get("section_id");
                Section {
                    section_id,
                    course_id: row.get("course_id"),
                    title: row.get("title"),
                    order_index: row.get("order_index"),
                    lectures: lectures
                        .iter()
                        .filter(|l| l.section_id == section_id)
                        .cloned()
                        .collect(),
                }
            })
            .collect())
    }

    /// Find a lecture only if it belongs to the given course
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_lecture_in_course(
        &self,
        course_id: i64,
        lecture_id: i64,
    ) -> AppResult<Option<Lecture>> {
        let row = sqlx::query(
            r"
            SELECT l.* FROM lectures l
            JOIN course_sections s ON l.section_id = s.section_id
            WHERE l.lecture_id = $1 AND s.course_id = $2
            ",
        )
        .bind(lecture_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get lecture: {e}")))?;
        Ok(row.as_ref().map(lecture_from_row))
    }

    /// Append a section to an instructor's own course
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course is not owned by the instructor,
    /// `InvalidInput` for an empty title
    pub async fn add_section(&self, course_id: i64, instructor_id: i64, title: &str) -> AppResult<i64> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Section title is required"));
        }
        self.require_owned_course(course_id, instructor_id).await?;

        let section_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO course_sections (course_id, title, order_index)
            VALUES ($1, $2, (SELECT COALESCE(MAX(order_index), 0) + 1 FROM course_sections WHERE course_id = $1))
            RETURNING section_id
            ",
        )
        .bind(course_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add section: {e}")))?;

        info!(course_id, section_id, "Section added");
        Ok(section_id)
    }

    /// Append a lecture to a section of an instructor's own course
    ///
    /// Recomputes `total_lectures` and `total_hours` on the course in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the section is missing or belongs to a course
    /// the instructor does not own, `InvalidInput` for invalid fields
    pub async fn add_lecture(
        &self,
        section_id: i64,
        instructor_id: i64,
        input: &LectureInput,
    ) -> AppResult<i64> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Lecture title is required"));
        }
        if input.duration_seconds < 0 {
            return Err(AppError::invalid_input("Duration cannot be negative"));
        }

        let course_id: i64 = sqlx::query_scalar(
            r"
            SELECT s.course_id FROM course_sections s
            JOIN courses c ON c.course_id = s.course_id
            WHERE s.section_id = $1 AND c.instructor_id = $2
            ",
        )
        .bind(section_id)
        .bind(instructor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load section: {e}")))?
        .ok_or_else(|| AppError::not_found("Section"))?;

        let mut guard = self.begin().await?;

        let lecture_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO lectures (section_id, title, video_url, duration_seconds, is_preview, order_index)
            VALUES ($1, $2, $3, $4, $5, (SELECT COALESCE(MAX(order_index), 0) + 1 FROM lectures WHERE section_id = $1))
            RETURNING lecture_id
            ",
        )
        .bind(section_id)
        .bind(title)
        .bind(input.video_url.as_deref().map(str::trim).filter(|u| !u.is_empty()))
        .bind(input.duration_seconds)
        .bind(input.is_preview)
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to add lecture: {e}")))?;

        sqlx::query(
            r"
            UPDATE courses SET
                total_lectures = (
                    SELECT COUNT(*) FROM lectures l
                    JOIN course_sections s ON l.section_id = s.section_id
                    WHERE s.course_id = $1
                ),
                total_hours = (
                    SELECT ROUND(COALESCE(SUM(l.duration_seconds), 0) / 3600.0, 1) FROM lectures l
                    JOIN course_sections s ON l.section_id = s.section_id
                    WHERE s.course_id = $1
                ),
                updated_at = $2
            WHERE course_id = $1
            ",
        )
        .bind(course_id)
        .bind(now_rfc3339())
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update course totals: {e}")))?;

        guard.commit().await?;
        info!(course_id, section_id, lecture_id, "Lecture added");
        Ok(lecture_id)
    }
}
