// ABOUTME: Category hierarchy storage (subject areas and subcategories)
// ABOUTME: Admin create/rename/delete plus home-page category rankings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use chrono::{Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::Database;
use crate::constants::catalog;
use crate::errors::{AppError, AppResult};
use crate::models::{Category, CategoryStats, CategoryTree};

fn category_from_row(row: &SqliteRow) -> Category {
    Category {
        category_id: row.get("category_id"),
        name: row.get("name"),
        parent_id: row.get("parent_id"),
    }
}

fn category_stats_from_row(row: &SqliteRow) -> CategoryStats {
    CategoryStats {
        category_id: row.get("category_id"),
        category_name: row.get("category_name"),
        parent_name: row.get("parent_name"),
        course_count: row.get("course_count"),
        total_students: row.get("total_students"),
        avg_star: row.get("avg_star"),
        weekly_enrollments: row.get("weekly_enrollments"),
    }
}

fn validate_category_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("Category name is required"));
    }
    if name.chars().count() > 100 {
        return Err(AppError::invalid_input(
            "Category name must be at most 100 characters",
        ));
    }
    Ok(name)
}

/// Shared aggregate used by the category rankings; `$1` is the weekly cutoff
const CATEGORY_STATS_SELECT: &str = r"
    SELECT
        cat.category_id,
        cat.name AS category_name,
        COALESCE(parent.name, '') AS parent_name,
        COUNT(c.course_id) AS course_count,
        COALESCE(SUM(c.student_count), 0) AS total_students,
        COALESCE(ROUND(AVG(c.star), 1), 0.0) AS avg_star,
        (
            SELECT COUNT(*)
            FROM enrollments e
            JOIN courses ec ON ec.course_id = e.course_id
            WHERE ec.category_id = cat.category_id AND e.enrolled_at >= $1
        ) AS weekly_enrollments
    FROM categories cat
    LEFT JOIN categories parent ON cat.parent_id = parent.category_id
    LEFT JOIN courses c ON c.category_id = cat.category_id AND c.status != 'suspended'
    GROUP BY cat.category_id, cat.name, parent.name
";

impl Database {
    /// All categories, subject areas first, then by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query(
            r"
            SELECT category_id, name, parent_id FROM categories
            ORDER BY COALESCE(parent_id, category_id), parent_id IS NOT NULL, name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list categories: {e}")))?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Subject areas with their subcategories, for navigation
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn category_tree(&self) -> AppResult<Vec<CategoryTree>> {
        let categories = self.list_categories().await?;
        let mut tree: Vec<CategoryTree> = categories
            .iter()
            .filter(|c| c.is_top_level())
            .map(|c| CategoryTree {
                category: c.clone(),
                children: Vec::new(),
            })
            .collect();
        for child in categories.into_iter().filter(|c| !c.is_top_level()) {
            if let Some(node) = tree
                .iter_mut()
                .find(|n| Some(n.category.category_id) == child.parent_id)
            {
                node.children.push(child);
            }
        }
        Ok(tree)
    }

    /// Get a category by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_category(&self, category_id: i64) -> AppResult<Option<Category>> {
        let row =
            sqlx::query("SELECT category_id, name, parent_id FROM categories WHERE category_id = $1")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to get category: {e}")))?;
        Ok(row.as_ref().map(category_from_row))
    }

    /// Get a category by name, ignoring case and surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_category_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let row = sqlx::query(
            "SELECT category_id, name, parent_id FROM categories WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get category by name: {e}")))?;
        Ok(row.as_ref().map(category_from_row))
    }

    /// Create a category; a parent must exist and be a subject area
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad name or parent, `ResourceAlreadyExists`
    /// for a duplicate name
    pub async fn create_category(&self, name: &str, parent_id: Option<i64>) -> AppResult<Category> {
        let name = validate_category_name(name)?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .get_category(parent_id)
                .await?
                .ok_or_else(|| AppError::invalid_input("Parent category does not exist"))?;
            if !parent.is_top_level() {
                return Err(AppError::invalid_input(
                    "Parent category must be a top-level category",
                ));
            }
        }

        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, parent_id) VALUES ($1, $2) RETURNING category_id",
        )
        .bind(name)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to create category", &e))?;

        info!(category_id, name, "Category created");
        Ok(Category {
            category_id,
            name: name.to_owned(),
            parent_id,
        })
    }

    /// Rename a category
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if missing, `ResourceAlreadyExists` if the name is taken
    pub async fn rename_category(&self, category_id: i64, name: &str) -> AppResult<()> {
        let name = validate_category_name(name)?;
        let result = sqlx::query("UPDATE categories SET name = $1 WHERE category_id = $2")
            .bind(name)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx("Failed to rename category", &e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Category"));
        }
        Ok(())
    }

    /// Delete a category that has no courses and no subcategories
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when courses or subcategories are still linked,
    /// `ResourceNotFound` if the category does not exist
    pub async fn delete_category(&self, category_id: i64) -> AppResult<()> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM courses WHERE category_id = $1) AS course_count,
                (SELECT COUNT(*) FROM categories WHERE parent_id = $1) AS child_count
            ",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check category usage: {e}")))?;

        let course_count: i64 = row.get("course_count");
        let child_count: i64 = row.get("child_count");
        if course_count > 0 {
            return Err(AppError::invalid_input(format!(
                "Cannot delete a category with {course_count} linked course(s)"
            )));
        }
        if child_count > 0 {
            return Err(AppError::invalid_input(format!(
                "Cannot delete a category with {child_count} subcategory(ies)"
            )));
        }

        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete category: {e}")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Category"));
        }
        info!(category_id, "Category deleted");
        Ok(())
    }

    /// Categories with the most students, then the best average star
    ///
    /// Only categories with at least one listed course are ranked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn top_categories(&self, limit: i64) -> AppResult<Vec<CategoryStats>> {
        let sql = format!(
            "{CATEGORY_STATS_SELECT} HAVING COUNT(c.course_id) > 0 \
             ORDER BY total_students DESC, avg_star DESC, cat.name LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(weekly_cutoff())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to rank categories: {e}")))?;
        Ok(rows.iter().map(category_stats_from_row).collect())
    }

    /// Categories with the most enrollments in the last week
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn top_categories_by_weekly_enrollment(
        &self,
        limit: i64,
    ) -> AppResult<Vec<CategoryStats>> {
        let sql = format!(
            "{CATEGORY_STATS_SELECT} HAVING weekly_enrollments > 0 \
             ORDER BY weekly_enrollments DESC, total_students DESC, cat.name LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(weekly_cutoff())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to rank categories: {e}")))?;
        Ok(rows.iter().map(category_stats_from_row).collect())
    }

    /// Every category with its counters, for the admin list
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_category_stats(&self) -> AppResult<Vec<CategoryStats>> {
        let sql = format!(
            "{CATEGORY_STATS_SELECT} ORDER BY COALESCE(cat.parent_id, cat.category_id), \
             cat.parent_id IS NOT NULL, cat.name"
        );
        let rows = sqlx::query(&sql)
            .bind(weekly_cutoff())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list category stats: {e}")))?;
        Ok(rows.iter().map(category_stats_from_row).collect())
    }
}

fn weekly_cutoff() -> String {
    (Utc::now() - Duration::days(catalog::WEEKLY_WINDOW_DAYS)).to_rfc3339()
}
