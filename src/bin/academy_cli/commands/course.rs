// ABOUTME: Course commands for academy-cli: list every course and toggle the bestseller badge
// ABOUTME: Bestseller flags drive the home page and category filter sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use clap::Subcommand;

use online_academy::database::Database;
use online_academy::errors::AppResult;

#[derive(Subcommand)]
pub enum CourseCommand {
    /// List all courses with status and counters
    List,
    /// Flag a course as a bestseller
    Bestseller {
        /// Course id
        id: i64,
        /// Remove the flag instead
        #[arg(long)]
        off: bool,
    },
}

pub async fn run(database: &Database, command: CourseCommand) -> AppResult<()> {
    match command {
        CourseCommand::List => {
            for course in database.list_all_courses().await? {
                println!(
                    "#{:<5} {:<40} {:<10} students={:<5} star={:.1}{}",
                    course.course_id,
                    course.title,
                    course.status.as_str(),
                    course.student_count,
                    course.star,
                    if course.is_bestseller { " [bestseller]" } else { "" }
                );
            }
        }
        CourseCommand::Bestseller { id, off } => {
            database.set_bestseller(id, !off).await?;
            println!(
                "Course #{id} {}",
                if off { "is no longer a bestseller" } else { "flagged as bestseller" }
            );
        }
    }
    Ok(())
}
