// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, a recording mailer, account and course fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `online_academy`
//!
//! Databases are in-memory `SQLite`. Fixture accounts are created directly
//! with a low-cost bcrypt hash of [`TEST_PASSWORD`] so tests stay fast.

use std::env;
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;

use online_academy::config::environment::ServerConfig;
use online_academy::database::accounts::NewAccount;
use online_academy::database::courses::CourseInput;
use online_academy::database::curriculum::LectureInput;
use online_academy::database::Database;
use online_academy::errors::AppResult;
use online_academy::external::{MailMessage, Mailer};
use online_academy::models::{Account, AuthProvider, Category, Course, CourseStatus, Instructor};
use online_academy::resources::ServerResources;

static INIT_LOGGER: Once = Once::new();

/// Password of every fixture account
pub const TEST_PASSWORD: &str = "Password123";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh migrated in-memory database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Mailer that keeps every message for inspection
#[derive(Default)]
pub struct RecordingMailer {
    messages: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn messages(&self) -> Vec<MailMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Most recent 6-digit code sent to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| m.subject.rsplit(' ').next().map(str::to_owned))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Test configuration: plain HTTP base URL, no mail provider, no Google
pub fn test_config() -> ServerConfig {
    ServerConfig {
        base_url: "http://localhost:3000".to_owned(),
        ..ServerConfig::default()
    }
}

/// Server resources over a fresh database with a recording mailer
pub async fn create_test_resources() -> Result<(Arc<ServerResources>, Arc<RecordingMailer>)> {
    let database = create_test_database().await?;
    let mailer = Arc::new(RecordingMailer::default());
    let resources =
        ServerResources::with_mailer(database, Arc::new(test_config()), mailer.clone())?;
    Ok((Arc::new(resources), mailer))
}

fn fixture_account(email: &str, full_name: &str) -> Result<NewAccount> {
    Ok(NewAccount {
        email: email.to_owned(),
        password_hash: bcrypt::hash(TEST_PASSWORD, 4)?,
        full_name: full_name.to_owned(),
        is_verified: true,
        avatar_url: None,
        auth_provider: AuthProvider::Email,
    })
}

/// Verified student; returns the account and its student id
pub async fn create_test_student(database: &Database, email: &str) -> Result<(Account, i64)> {
    let account = database
        .create_student_account(&fixture_account(email, "Test Student")?)
        .await?;
    let student_id = database.require_student_id(account.account_id).await?;
    Ok((account, student_id))
}

/// Verified instructor with profile
pub async fn create_test_instructor(
    database: &Database,
    email: &str,
) -> Result<(Account, Instructor)> {
    let account = database
        .create_instructor_account(&fixture_account(email, "Test Instructor")?, Some("Teaches things"))
        .await?;
    let instructor = database
        .get_instructor_by_account(account.account_id)
        .await?
        .expect("instructor profile created with account");
    Ok((account, instructor))
}

/// Verified administrator
pub async fn create_test_admin(database: &Database, email: &str) -> Result<Account> {
    Ok(database
        .create_admin_account(&fixture_account(email, "Test Admin")?)
        .await?)
}

/// Signed session token for an account
pub fn session_for(resources: &ServerResources, account: &Account) -> String {
    resources.sessions.issue(account).unwrap()
}

/// Top-level category plus one subcategory
pub async fn create_test_categories(database: &Database) -> Result<(Category, Category)> {
    let parent = database.create_category("Development", None).await?;
    let child = database
        .create_category("Web Development", Some(parent.category_id))
        .await?;
    Ok((parent, child))
}

/// Course input with sensible defaults
pub fn course_input(title: &str, category_id: Option<i64>) -> CourseInput {
    CourseInput {
        title: title.to_owned(),
        description: format!("Learn {title} step by step"),
        detail_html: "<p>Details</p>".to_owned(),
        image_url: None,
        current_price: 199_000,
        original_price: 499_000,
        category_id,
    }
}

/// Active course with one section of `lectures` ten-minute lectures
pub async fn create_listed_course(
    database: &Database,
    instructor_id: i64,
    title: &str,
    category_id: Option<i64>,
    lectures: usize,
) -> Result<(Course, Vec<i64>)> {
    let course = database
        .create_course(instructor_id, course_input(title, category_id))
        .await?;
    let mut lecture_ids = Vec::with_capacity(lectures);
    if lectures > 0 {
        let section_id = database
            .add_section(course.course_id, instructor_id, "Getting started")
            .await?;
        for n in 1..=lectures {
            let lecture_id = database
                .add_lecture(
                    section_id,
                    instructor_id,
                    &LectureInput {
                        title: format!("Lecture {n}"),
                        video_url: None,
                        duration_seconds: 600,
                        is_preview: n == 1,
                    },
                )
                .await?;
            lecture_ids.push(lecture_id);
        }
    }
    database
        .set_course_status(course.course_id, CourseStatus::Active)
        .await?;
    let course = database
        .get_course(course.course_id)
        .await?
        .expect("course just created");
    Ok((course, lecture_ids))
}
