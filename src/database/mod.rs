// ABOUTME: SQLite database handle, pool setup and embedded migrations
// ABOUTME: Entity operations live in sibling modules as impl Database blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Account storage and lookups
pub mod accounts;
/// Category tree and category statistics
pub mod categories;
/// Catalog queries and course lifecycle
pub mod courses;
/// Sections and lectures
pub mod curriculum;
/// Enrollment and enrolled-course listings
pub mod enrollments;
/// Instructor profiles and dashboard statistics
pub mod instructors;
/// Per-lecture completion and course progress rollup
pub mod lecture_progress;
/// One-time password storage
pub mod otp;
/// Course reviews and star recompute
pub mod reviews;
/// Dashboard counters and user listings
pub mod stats;
/// Student profiles
pub mod students;
/// RAII transaction guard
pub mod transactions;
/// Saved courses
pub mod watchlist;

pub use lecture_progress::compute_progress;
pub use transactions::SqliteTransactionGuard;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{CourseCard, CourseStatus};

/// Shared database handle (cheap to clone)
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

/// File path of a `sqlite:` URL, without query parameters
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

impl Database {
    /// Connect with default pool settings and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        Self::with_config(&DatabaseConfig {
            url: database_url.to_owned(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Connect using explicit pool settings and run migrations
    ///
    /// In-memory databases are pinned to a single connection that never
    /// expires, otherwise every pooled connection would see its own empty
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - `SQLite` file creation fails
    /// - Migration process fails
    pub async fn with_config(config: &DatabaseConfig) -> AppResult<Self> {
        let in_memory = config.url.contains(":memory:");
        if !in_memory {
            if let Some(parent) = sqlite_file_path(&config.url)
                .and_then(|path| path.parent().map(Path::to_path_buf))
                .filter(|parent| !parent.as_os_str().is_empty())
            {
                tokio::fs::create_dir_all(&parent).await.map_err(|e| {
                    AppError::database(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms));
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(in_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run embedded migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database migration failed: {e}")))
    }

    /// Open a transaction wrapped in a rollback-on-drop guard
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be acquired
    pub async fn begin(&self) -> AppResult<SqliteTransactionGuard> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(SqliteTransactionGuard::new(tx))
    }

    /// Check that the database answers queries
    ///
    /// # Errors
    ///
    /// Returns an error if the ping query fails
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }
}

/// Columns and joins shared by every course-card query
pub(crate) const COURSE_CARD_SELECT: &str = r"
    SELECT
        c.course_id, c.title, c.description, c.image_url,
        c.current_price, c.original_price, c.student_count, c.view_count,
        c.star, c.is_bestseller, c.status, c.total_hours, c.total_lectures,
        c.created_at,
        i.name AS instructor_name,
        cat.name AS category_name
    FROM courses c
    LEFT JOIN instructors i ON c.instructor_id = i.instructor_id
    LEFT JOIN categories cat ON c.category_id = cat.category_id
";

/// Map a row selected with [`COURSE_CARD_SELECT`]
pub(crate) fn course_card_from_row(row: &SqliteRow) -> AppResult<CourseCard> {
    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    Ok(CourseCard {
        course_id: row.get("course_id"),
        title: row.get("title"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        current_price: row.get("current_price"),
        original_price: row.get("original_price"),
        student_count: row.get("student_count"),
        view_count: row.get("view_count"),
        star: row.get("star"),
        is_bestseller: row.get("is_bestseller"),
        status: CourseStatus::parse(&status)?,
        total_hours: row.get("total_hours"),
        total_lectures: row.get("total_lectures"),
        instructor_name: row.get("instructor_name"),
        category_name: row.get("category_name"),
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Parse an RFC3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp '{value}': {e}")))
}

/// Current time in the stored format
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
