// ABOUTME: Course catalog queries (home sections, category listings, detail page)
// ABOUTME: Course lifecycle: create, edit, status changes, view logging and cascading delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use chrono::{Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{
    course_card_from_row, instructors::instructor_from_row, now_rfc3339, parse_timestamp,
    Database, COURSE_CARD_SELECT,
};
use crate::constants::catalog;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Category, Course, CourseCard, CourseDetails, CourseImage, CourseStatus,
};

/// Fields an instructor supplies when creating or editing a course
#[derive(Debug, Clone)]
pub struct CourseInput {
    /// Title
    pub title: String,
    /// Short description
    pub description: String,
    /// Long description
    pub detail_html: String,
    /// Cover image
    pub image_url: Option<String>,
    /// Selling price in VND
    pub current_price: i64,
    /// List price in VND
    pub original_price: i64,
    /// Category
    pub category_id: Option<i64>,
}

impl CourseInput {
    /// Validate and normalize
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty title or inconsistent prices
    pub fn validated(mut self) -> AppResult<Self> {
        self.title = self.title.trim().to_owned();
        self.description = self.description.trim().to_owned();
        self.image_url = self
            .image_url
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty());
        if self.title.is_empty() {
            return Err(AppError::invalid_input("Course title is required"));
        }
        if self.title.chars().count() > 200 {
            return Err(AppError::invalid_input(
                "Course title must be at most 200 characters",
            ));
        }
        if self.current_price < 0 || self.original_price < 0 {
            return Err(AppError::invalid_input("Prices cannot be negative"));
        }
        if self.original_price == 0 {
            self.original_price = self.current_price;
        }
        if self.current_price > self.original_price {
            return Err(AppError::invalid_input(
                "Current price cannot exceed the original price",
            ));
        }
        Ok(self)
    }
}

pub(crate) fn course_from_row(row: &SqliteRow) -> AppResult<Course> {
    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok(Course {
        course_id: row.get("course_id"),
        title: row.get("title"),
        description: row.get("description"),
        detail_html: row.get("detail_html"),
        image_url: row.get("image_url"),
        current_price: row.get("current_price"),
        original_price: row.get("original_price"),
        total_hours: row.get("total_hours"),
        total_lectures: row.get("total_lectures"),
        status: CourseStatus::parse(&status)?,
        is_bestseller: row.get("is_bestseller"),
        category_id: row.get("category_id"),
        instructor_id: row.get("instructor_id"),
        view_count: row.get("view_count"),
        student_count: row.get("student_count"),
        star: row.get("star"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

impl Database {
    async fn fetch_cards(&self, sql: &str, limit: Option<i64>, context: &str) -> AppResult<Vec<CourseCard>> {
        let mut query = sqlx::query(sql);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load {context}: {e}")))?;
        rows.iter().map(course_card_from_row).collect()
    }

    /// Bestsellers first, then by students and recency
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn popular_courses(&self, limit: i64) -> AppResult<Vec<CourseCard>> {
        let sql = format!(
            "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' \
             ORDER BY c.is_bestseller DESC, c.student_count DESC, c.created_at DESC LIMIT $1"
        );
        self.fetch_cards(&sql, Some(limit), "popular courses").await
    }

    /// Flagged bestsellers, optionally within one category
    ///
    /// `None`, "all" and "tất cả" mean every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn best_sellers(
        &self,
        limit: i64,
        category_name: Option<&str>,
    ) -> AppResult<Vec<CourseCard>> {
        let category = category_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .filter(|n| !n.eq_ignore_ascii_case("all") && n.to_lowercase() != "tất cả");

        let rows = if let Some(category) = category {
            let sql = format!(
                "{COURSE_CARD_SELECT} WHERE c.is_bestseller = 1 AND c.status != 'suspended' \
                 AND LOWER(cat.name) = LOWER($1) \
                 ORDER BY c.student_count DESC, c.created_at DESC LIMIT $2"
            );
            sqlx::query(&sql)
                .bind(category)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
        } else {
            let sql = format!(
                "{COURSE_CARD_SELECT} WHERE c.is_bestseller = 1 AND c.status != 'suspended' \
                 ORDER BY c.student_count DESC, c.created_at DESC LIMIT $1"
            );
            sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await
        }
        .map_err(|e| AppError::database(format!("Failed to load best sellers: {e}")))?;

        rows.iter().map(course_card_from_row).collect()
    }

    /// Most viewed in the last week, then students, star and recency
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn weekly_highlights(&self, limit: i64) -> AppResult<Vec<CourseCard>> {
        let cutoff = (Utc::now() - Duration::days(catalog::WEEKLY_WINDOW_DAYS)).to_rfc3339();
        let sql = format!(
            "{COURSE_CARD_SELECT} \
             LEFT JOIN course_views v ON v.course_id = c.course_id AND v.viewed_at >= $1 \
             WHERE c.status != 'suspended' \
             GROUP BY c.course_id \
             ORDER BY COUNT(v.view_id) DESC, c.student_count DESC, c.star DESC, c.created_at DESC \
             LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load weekly highlights: {e}")))?;
        rows.iter().map(course_card_from_row).collect()
    }

    /// Most recently created
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn newest_courses(&self, limit: i64) -> AppResult<Vec<CourseCard>> {
        let sql = format!(
            "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' \
             ORDER BY c.created_at DESC, c.course_id DESC LIMIT $1"
        );
        self.fetch_cards(&sql, Some(limit), "newest courses").await
    }

    /// Most viewed of all time
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn top_viewed_courses(&self, limit: i64) -> AppResult<Vec<CourseCard>> {
        let sql = format!(
            "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' \
             ORDER BY c.view_count DESC, c.star DESC, c.student_count DESC LIMIT $1"
        );
        self.fetch_cards(&sql, Some(limit), "top viewed courses").await
    }

    /// Every listed course, newest first (input to search ranking)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn listed_courses(&self) -> AppResult<Vec<CourseCard>> {
        let sql = format!(
            "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' ORDER BY c.created_at DESC, c.course_id DESC"
        );
        self.fetch_cards(&sql, None, "listed courses").await
    }

    /// One page of listed courses plus the total count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_courses_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> AppResult<(Vec<CourseCard>, i64)> {
        let page = page.max(1);
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE status != 'suspended'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count courses: {e}")))?;

        let sql = format!(
            "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' \
             ORDER BY c.created_at DESC, c.course_id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&sql)
            .bind(page_size)
            .bind((page - 1).saturating_mul(page_size))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list courses: {e}")))?;
        let cards = rows
            .iter()
            .map(course_card_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((cards, total))
    }

    /// Every course regardless of status, for the admin list
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_all_courses(&self) -> AppResult<Vec<CourseCard>> {
        let sql = format!("{COURSE_CARD_SELECT} ORDER BY c.created_at DESC, c.course_id DESC");
        self.fetch_cards(&sql, None, "all courses").await
    }

    /// Listed courses of a category looked up by name
    ///
    /// A subject area yields its own courses and those of its subcategories;
    /// a subcategory yields only its own. Unknown names yield nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn courses_by_category_name(&self, name: &str) -> AppResult<Vec<CourseCard>> {
        let Some(category) = self.get_category_by_name(name).await? else {
            return Ok(Vec::new());
        };

        let sql = if category.is_top_level() {
            format!(
                "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' \
                 AND (cat.category_id = $1 OR cat.parent_id = $1) \
                 ORDER BY c.course_id DESC"
            )
        } else {
            format!(
                "{COURSE_CARD_SELECT} WHERE c.status != 'suspended' AND cat.category_id = $1 \
                 ORDER BY c.course_id DESC"
            )
        };

        let rows = sqlx::query(&sql)
            .bind(category.category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load category courses: {e}")))?;
        rows.iter().map(course_card_from_row).collect()
    }

    /// Get a course row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_course(&self, course_id: i64) -> AppResult<Option<Course>> {
        let row = sqlx::query("SELECT * FROM courses WHERE course_id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get course: {e}")))?;
        row.as_ref().map(course_from_row).transpose()
    }

    /// Get a course card by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_course_card(&self, course_id: i64) -> AppResult<Option<CourseCard>> {
        let sql = format!("{COURSE_CARD_SELECT} WHERE c.course_id = $1");
        let row = sqlx::query(&sql)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get course: {e}")))?;
        row.as_ref().map(course_card_from_row).transpose()
    }

    /// Everything the detail page needs
    ///
    /// Returns `None` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails
    #[tracing::instrument(skip(self), fields(operation = "course_details"))]
    pub async fn course_details(&self, course_id: i64) -> AppResult<Option<CourseDetails>> {
        let Some(course) = self.get_course(course_id).await? else {
            return Ok(None);
        };

        let instructor_row = sqlx::query("SELECT * FROM instructors WHERE instructor_id = $1")
            .bind(course.instructor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get course instructor: {e}")))?;
        let instructor = instructor_from_row(&instructor_row)?;

        let category: Option<Category> = match course.category_id {
            Some(id) => self.get_category(id).await?,
            None => None,
        };

        let counts = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM enrollments WHERE course_id = $1) AS enrollment_count,
                (SELECT COALESCE(ROUND(AVG(rating), 1), 0.0) FROM reviews WHERE course_id = $1)
                    AS average_rating,
                (SELECT COUNT(*) FROM reviews WHERE course_id = $1) AS review_count
            ",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count course stats: {e}")))?;

        let sections = self.list_sections(course_id).await?;
        let reviews = self.list_reviews_for_course(course_id).await?;

        let related = match course.category_id {
            Some(category_id) => {
                let sql = format!(
                    "{COURSE_CARD_SELECT} WHERE c.category_id = $1 AND c.course_id != $2 \
                     AND c.status != 'suspended' \
                     ORDER BY (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.course_id) DESC, \
                     c.star DESC LIMIT $3"
                );
                let rows = sqlx::query(&sql)
                    .bind(category_id)
                    .bind(course_id)
                    .bind(catalog::RELATED_COURSES)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to load related courses: {e}")))?;
                rows.iter()
                    .map(course_card_from_row)
                    .collect::<AppResult<Vec<_>>>()?
            }
            None => Vec::new(),
        };

        let images = sqlx::query(
            "SELECT image_url, description FROM course_images WHERE course_id = $1 ORDER BY image_id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load gallery: {e}")))?
        .iter()
        .map(|row| CourseImage {
            image_url: row.get("image_url"),
            description: row.get("description"),
        })
        .collect();

        Ok(Some(CourseDetails {
            course,
            instructor,
            category,
            enrollment_count: counts.get("enrollment_count"),
            average_rating: counts.get("average_rating"),
            review_count: counts.get("review_count"),
            sections,
            reviews,
            related,
            images,
        }))
    }

    /// Count a detail-page view: bump the counter and log the view atomically
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course does not exist
    pub async fn record_course_view(&self, course_id: i64) -> AppResult<()> {
        let mut guard = self.begin().await?;

        let result =
            sqlx::query("UPDATE courses SET view_count = view_count + 1 WHERE course_id = $1")
                .bind(course_id)
                .execute(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to count view: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Course"));
        }

        sqlx::query("INSERT INTO course_views (course_id, viewed_at) VALUES ($1, $2)")
            .bind(course_id)
            .bind(now_rfc3339())
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to log view: {e}")))?;

        guard.commit().await
    }

    /// Create a course owned by an instructor with status `incomplete`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for invalid fields or an unknown category
    pub async fn create_course(&self, instructor_id: i64, input: CourseInput) -> AppResult<Course> {
        let input = input.validated()?;
        self.ensure_category_exists(input.category_id).await?;
        let now = now_rfc3339();

        let course_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO courses (
                title, description, detail_html, image_url, current_price, original_price,
                status, category_id, instructor_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, 'incomplete', $7, $8, $9, $9)
            RETURNING course_id
            ",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.detail_html)
        .bind(&input.image_url)
        .bind(input.current_price)
        .bind(input.original_price)
        .bind(input.category_id)
        .bind(instructor_id)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create course: {e}")))?;

        info!(course_id, instructor_id, "Course created");
        self.get_course(course_id)
            .await?
            .ok_or_else(|| AppError::internal("Course vanished after creation"))
    }

    /// Edit an instructor's own course
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the course is missing or owned by someone
    /// else, `InvalidInput` for invalid fields or a status instructors cannot set
    pub async fn update_course(
        &self,
        course_id: i64,
        instructor_id: i64,
        input: CourseInput,
        status: CourseStatus,
    ) -> AppResult<()> {
        let input = input.validated()?;
        if !status.instructor_settable() {
            return Err(AppError::invalid_input(
                "Instructors can only mark a course incomplete or complete",
            ));
        }
        let course = self.require_owned_course(course_id, instructor_id).await?;
        if course.status == CourseStatus::Suspended {
            return Err(AppError::permission_denied(
                "This course was suspended by an administrator",
            ));
        }
        self.ensure_category_exists(input.category_id).await?;

        sqlx::query(
            r"
            UPDATE courses SET
                title = $1, description = $2, detail_html = $3, image_url = $4,
                current_price = $5, original_price = $6, category_id = $7,
                status = $8, updated_at = $9
            WHERE course_id = $10
            ",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.detail_html)
        .bind(&input.image_url)
        .bind(input.current_price)
        .bind(input.original_price)
        .bind(input.category_id)
        .bind(status.as_str())
        .bind(now_rfc3339())
        .bind(course_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update course: {e}")))?;

        Ok(())
    }

    /// Administrative status change (suspend / activate)
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course does not exist
    pub async fn set_course_status(&self, course_id: i64, status: CourseStatus) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE courses SET status = $1, updated_at = $2 WHERE course_id = $3")
                .bind(status.as_str())
                .bind(now_rfc3339())
                .bind(course_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to update course status: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Course"));
        }
        info!(course_id, status = status.as_str(), "Course status changed");
        Ok(())
    }

    /// Flag or unflag a course as a bestseller
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course does not exist
    pub async fn set_bestseller(&self, course_id: i64, is_bestseller: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE courses SET is_bestseller = $1 WHERE course_id = $2")
            .bind(is_bestseller)
            .bind(course_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to flag bestseller: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Course"));
        }
        Ok(())
    }

    /// Add a gallery image
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn add_course_image(
        &self,
        course_id: i64,
        image_url: &str,
        description: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO course_images (course_id, image_url, description) VALUES ($1, $2, $3)",
        )
        .bind(course_id)
        .bind(image_url)
        .bind(description)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add course image: {e}")))?;
        Ok(())
    }

    /// Delete a course owned by the given instructor
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course is missing or not owned
    pub async fn delete_instructor_course(&self, course_id: i64, instructor_id: i64) -> AppResult<()> {
        self.require_owned_course(course_id, instructor_id).await?;
        self.delete_course(course_id).await
    }

    /// Delete a course and every dependent row in one transaction
    ///
    /// Student counters on the instructor are reduced by the removed
    /// enrollments. Either everything goes or nothing does.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the course does not exist
    #[tracing::instrument(skip(self), fields(operation = "delete_course"))]
    pub async fn delete_course(&self, course_id: i64) -> AppResult<()> {
        let mut guard = self.begin().await?;

        let instructor_id: i64 =
            sqlx::query_scalar("SELECT instructor_id FROM courses WHERE course_id = $1")
                .bind(course_id)
                .fetch_optional(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to load course: {e}")))?
                .ok_or_else(|| AppError::not_found("Course"))?;

        let enrollment_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to count enrollments: {e}")))?;

        let cascade = [
            (
                "lecture progress",
                r"DELETE FROM lecture_progress WHERE lecture_id IN (
                    SELECT l.lecture_id FROM lectures l
                    JOIN course_sections s ON l.section_id = s.section_id
                    WHERE s.course_id = $1)",
            ),
            (
                "lectures",
                r"DELETE FROM lectures WHERE section_id IN (
                    SELECT section_id FROM course_sections WHERE course_id = $1)",
            ),
            ("sections", "DELETE FROM course_sections WHERE course_id = $1"),
            ("enrollments", "DELETE FROM enrollments WHERE course_id = $1"),
            ("reviews", "DELETE FROM reviews WHERE course_id = $1"),
            ("watchlist", "DELETE FROM watchlist WHERE course_id = $1"),
            ("views", "DELETE FROM course_views WHERE course_id = $1"),
            ("images", "DELETE FROM course_images WHERE course_id = $1"),
            ("course", "DELETE FROM courses WHERE course_id = $1"),
        ];
        for (what, sql) in cascade {
            sqlx::query(sql)
                .bind(course_id)
                .execute(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to delete course {what}: {e}")))?;
        }

        sqlx::query(
            "UPDATE instructors SET total_students = MAX(total_students - $1, 0) WHERE instructor_id = $2",
        )
        .bind(enrollment_count)
        .bind(instructor_id)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to update instructor counters: {e}")))?;

        guard.commit().await?;
        info!(course_id, enrollment_count, "Course deleted");
        Ok(())
    }

    /// Load a course and check the instructor owns it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when missing or owned by someone else
    pub async fn require_owned_course(&self, course_id: i64, instructor_id: i64) -> AppResult<Course> {
        self.get_course(course_id)
            .await?
            .filter(|c| c.instructor_id == instructor_id)
            .ok_or_else(|| AppError::not_found("Course"))
    }

    async fn ensure_category_exists(&self, category_id: Option<i64>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            if self.get_category(category_id).await?.is_none() {
                return Err(AppError::invalid_input("Selected category does not exist"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(current: i64, original: i64) -> CourseInput {
        CourseInput {
            title: "  Rust for Web  ".to_owned(),
            description: String::new(),
            detail_html: String::new(),
            image_url: Some("   ".to_owned()),
            current_price: current,
            original_price: original,
            category_id: None,
        }
    }

    #[test]
    fn test_course_input_normalizes() {
        let validated = input(199_000, 0).validated().unwrap();
        assert_eq!(validated.title, "Rust for Web");
        assert_eq!(validated.original_price, 199_000);
        assert!(validated.image_url.is_none());
    }

    #[test]
    fn test_course_input_rejects_bad_prices() {
        assert!(input(-1, 10).validated().is_err());
        assert!(input(500, 100).validated().is_err());
    }
}
