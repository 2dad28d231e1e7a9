// ABOUTME: Tests for file-backed SQLite databases: directory creation, migrations and persistence
// ABOUTME: Uses temporary directories so nothing is left behind on the developer machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use tempfile::TempDir;

use common::{create_test_instructor, init_test_logging};
use online_academy::config::DatabaseConfig;
use online_academy::database::Database;

#[tokio::test]
async fn test_file_database_creates_directory_and_persists() -> Result<()> {
    init_test_logging();
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("academy.db");
    let url = format!("sqlite:{}", path.display());

    {
        let db = Database::with_config(&DatabaseConfig {
            url: url.clone(),
            ..DatabaseConfig::default()
        })
        .await?;
        create_test_instructor(&db, "instructor@example.com").await?;
        db.create_category("Persistence", None).await?;
        db.pool().close().await;
    }
    assert!(path.exists());

    // Reopening runs migrations again without touching existing rows
    let db = Database::new(&url).await?;
    assert!(db.get_account_by_email("instructor@example.com").await?.is_some());
    assert!(db.get_category_by_name("persistence").await?.is_some());
    db.ping().await?;
    Ok(())
}

#[tokio::test]
async fn test_in_memory_databases_are_isolated() -> Result<()> {
    init_test_logging();
    let first = Database::new("sqlite::memory:").await?;
    let second = Database::new("sqlite::memory:").await?;

    first.create_category("Only Here", None).await?;
    assert!(second.get_category_by_name("Only Here").await?.is_none());
    assert_eq!(first.list_categories().await?.len(), 1);
    Ok(())
}
