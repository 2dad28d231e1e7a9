// ABOUTME: Operator command-line tool for Online Academy
// ABOUTME: Creates staff accounts and manages categories directly against the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! # academy-cli
//!
//! ```bash
//! # First administrator
//! cargo run --bin academy-cli -- account create --role admin --email admin@example.com --password 'Secret123'
//!
//! # Category tree
//! cargo run --bin academy-cli -- category create "Web Development"
//! cargo run --bin academy-cli -- category create "Rust" --parent "Web Development"
//! cargo run --bin academy-cli -- category list
//!
//! # Bestseller badge
//! cargo run --bin academy-cli -- course bestseller 3
//! ```

mod commands;

use std::env;

use clap::{Parser, Subcommand};

use online_academy::config::{DatabaseConfig, LogFormat};
use online_academy::database::Database;
use online_academy::errors::AppResult;
use online_academy::logging;

use commands::{account::AccountCommand, category::CategoryCommand, course::CourseCommand};

#[derive(Parser)]
#[command(
    name = "academy-cli",
    about = "Online Academy administration",
    long_about = "Manage accounts and categories of an Online Academy database"
)]
struct Cli {
    /// Database URL (defaults to DATABASE_URL, then the server default)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Account management
    #[command(subcommand)]
    Account(AccountCommand),
    /// Category management
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Course maintenance
    #[command(subcommand)]
    Course(CourseCommand),
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(LogFormat::Pretty, if cli.verbose { "debug" } else { "warn" })?;

    let url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DatabaseConfig::default().url);
    let database = Database::new(&url).await?;

    match cli.command {
        Command::Account(command) => commands::account::run(&database, command).await,
        Command::Category(command) => commands::category::run(&database, command).await,
        Command::Course(command) => commands::course::run(&database, command).await,
        Command::Migrate => {
            println!("Database at {url} is up to date");
            Ok(())
        }
    }
}
