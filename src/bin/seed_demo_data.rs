// ABOUTME: Demo data seeder: categories, instructors, courses with curriculum, students and activity
// ABOUTME: Refuses to run against a database that already has courses unless --force is given
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! # Demo data seeder
//!
//! ```bash
//! # Seed the configured database
//! cargo run --bin seed-demo-data
//!
//! # Seed a throwaway database
//! cargo run --bin seed-demo-data -- --database-url sqlite:./data/demo.db
//! ```
//!
//! Every seeded account uses the password given by `--password`.

use std::env;

use clap::Parser;
use tracing::{info, warn};

use online_academy::auth::provisioning::{provision_account, ProvisionRequest};
use online_academy::config::{DatabaseConfig, LogFormat};
use online_academy::database::courses::CourseInput;
use online_academy::database::curriculum::LectureInput;
use online_academy::database::Database;
use online_academy::errors::{AppError, AppResult};
use online_academy::logging;
use online_academy::models::{CourseStatus, Role};

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Online Academy demo data seeder",
    long_about = "Fill a database with categories, courses, accounts and learning activity for demos"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Password for every seeded account
    #[arg(long, default_value = "Academy2025")]
    password: String,

    /// Seed even if courses already exist
    #[arg(long)]
    force: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Subject areas and their subcategories
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Web Development", &["Frontend", "Backend"]),
    ("Mobile Development", &["Android", "iOS"]),
    ("Data Science", &["Machine Learning"]),
];

struct DemoCourse {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    instructor: usize,
    price: i64,
    original_price: i64,
    bestseller: bool,
    sections: &'static [(&'static str, &'static [(&'static str, i64)])],
}

const COURSES: &[DemoCourse] = &[
    DemoCourse {
        title: "Modern JavaScript from Zero",
        description: "Variables to async/await, with small projects after every chapter.",
        category: "Frontend",
        instructor: 0,
        price: 199_000,
        original_price: 499_000,
        bestseller: true,
        sections: &[
            ("Getting started", &[("Welcome", 180), ("Tooling setup", 540)]),
            ("Language core", &[("Values and types", 900), ("Functions", 1200), ("Promises", 1500)]),
        ],
    },
    DemoCourse {
        title: "React Components in Practice",
        description: "Build a real dashboard with hooks, context and testing.",
        category: "Frontend",
        instructor: 0,
        price: 299_000,
        original_price: 699_000,
        bestseller: false,
        sections: &[
            ("Foundations", &[("JSX", 600), ("Props and state", 1100)]),
            ("Patterns", &[("Custom hooks", 1300), ("Context", 1000)]),
        ],
    },
    DemoCourse {
        title: "Building REST APIs with Node.js",
        description: "Routing, validation, persistence and deployment of a production API.",
        category: "Backend",
        instructor: 1,
        price: 349_000,
        original_price: 349_000,
        bestseller: true,
        sections: &[
            ("HTTP basics", &[("Requests and responses", 700), ("Express routing", 1200)]),
            ("Data", &[("SQL with migrations", 1600)]),
        ],
    },
    DemoCourse {
        title: "Android Apps with Kotlin",
        description: "Jetpack Compose, navigation and local storage for your first app.",
        category: "Android",
        instructor: 1,
        price: 399_000,
        original_price: 899_000,
        bestseller: false,
        sections: &[("First app", &[("Project layout", 600), ("Compose basics", 1400)])],
    },
    DemoCourse {
        title: "Machine Learning Fundamentals",
        description: "Regression, classification and model evaluation with Python.",
        category: "Machine Learning",
        instructor: 0,
        price: 0,
        original_price: 0,
        bestseller: false,
        sections: &[
            ("Foundations", &[("What is learning?", 480), ("Linear regression", 1500)]),
            ("Evaluation", &[("Train/test splits", 900)]),
        ],
    },
];

const INSTRUCTORS: &[(&str, &str, &str)] = &[
    (
        "Nguyen Minh Anh",
        "minh.anh@academy.local",
        "Frontend engineer teaching JavaScript for ten years.",
    ),
    (
        "Tran Quoc Bao",
        "quoc.bao@academy.local",
        "Backend and mobile developer, former startup CTO.",
    ),
];

const STUDENTS: &[(&str, &str)] = &[
    ("Le Thu Ha", "thu.ha@academy.local"),
    ("Pham Gia Huy", "gia.huy@academy.local"),
    ("Vo Ngoc Lan", "ngoc.lan@academy.local"),
];

async fn seed_categories(database: &Database) -> AppResult<()> {
    for (area, children) in CATEGORIES {
        let parent = database.create_category(area, None).await?;
        for child in *children {
            database
                .create_category(child, Some(parent.category_id))
                .await?;
        }
    }
    info!("Seeded {} subject areas", CATEGORIES.len());
    Ok(())
}

async fn seed_courses(database: &Database, instructor_ids: &[i64]) -> AppResult<Vec<i64>> {
    let mut course_ids = Vec::with_capacity(COURSES.len());
    for demo in COURSES {
        let category = database
            .get_category_by_name(demo.category)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {}", demo.category)))?;
        let instructor_id = instructor_ids
            .get(demo.instructor)
            .copied()
            .ok_or_else(|| AppError::internal("Demo course references a missing instructor"))?;

        let course = database
            .create_course(
                instructor_id,
                CourseInput {
                    title: demo.title.to_owned(),
                    description: demo.description.to_owned(),
                    detail_html: format!("<p>{}</p>", demo.description),
                    image_url: None,
                    current_price: demo.price,
                    original_price: demo.original_price,
                    category_id: Some(category.category_id),
                },
            )
            .await?;

        for (section_title, lectures) in demo.sections {
            let section_id = database
                .add_section(course.course_id, instructor_id, section_title)
                .await?;
            for (index, (title, seconds)) in lectures.iter().enumerate() {
                database
                    .add_lecture(
                        section_id,
                        instructor_id,
                        &LectureInput {
                            title: (*title).to_owned(),
                            video_url: None,
                            duration_seconds: *seconds,
                            is_preview: index == 0,
                        },
                    )
                    .await?;
            }
        }

        database
            .set_course_status(course.course_id, CourseStatus::Active)
            .await?;
        if demo.bestseller {
            database.set_bestseller(course.course_id, true).await?;
        }
        database
            .add_course_image(
                course.course_id,
                "/static/placeholder.svg",
                Some("Course preview"),
            )
            .await?;
        course_ids.push(course.course_id);
    }
    info!("Seeded {} courses", course_ids.len());
    Ok(course_ids)
}

async fn seed_activity(database: &Database, student_ids: &[i64], course_ids: &[i64]) -> AppResult<()> {
    const FEEDBACK: &[&str] = &[
        "Clear explanations and good pacing.",
        "Exactly what I needed to get started.",
        "Great examples, a few videos could be shorter.",
    ];

    for (s, &student_id) in student_ids.iter().enumerate() {
        for (c, &course_id) in course_ids.iter().enumerate() {
            if (s + c) % 2 == 1 {
                database.add_to_watchlist(student_id, course_id).await?;
                continue;
            }
            database.enroll(student_id, course_id).await?;

            let details = database
                .course_details(course_id)
                .await?
                .ok_or_else(|| AppError::not_found("Course"))?;
            let lecture_ids: Vec<i64> = details.lectures().map(|l| l.lecture_id).collect();
            for lecture_id in lecture_ids.iter().take(s + 1) {
                database
                    .complete_lecture(student_id, course_id, *lecture_id)
                    .await?;
            }

            let rating = 5 - i64::try_from((s + c) % 3).unwrap_or(0);
            database
                .upsert_review(student_id, course_id, rating, FEEDBACK[(s + c) % FEEDBACK.len()])
                .await?;
        }
    }

    for (i, &course_id) in course_ids.iter().enumerate() {
        for _ in 0..=(i * 3) {
            database.record_course_view(course_id).await?;
        }
    }
    info!("Seeded enrollments, progress, reviews and views");
    Ok(())
}

async fn account_ids(
    database: &Database,
    role: Role,
    people: impl Iterator<Item = (&'static str, &'static str, Option<&'static str>)>,
    password: &str,
) -> AppResult<Vec<i64>> {
    let mut ids = Vec::new();
    for (name, email, bio) in people {
        let account = provision_account(
            database,
            role,
            &ProvisionRequest {
                full_name: name.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
                bio: bio.map(str::to_owned),
            },
        )
        .await?;
        ids.push(account.account_id);
    }
    Ok(ids)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = SeedArgs::parse();
    logging::init(LogFormat::Pretty, if args.verbose { "debug" } else { "info" })?;

    let url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DatabaseConfig::default().url);
    let database = Database::new(&url).await?;

    if !args.force && !database.list_all_courses().await?.is_empty() {
        warn!("Database already has courses; rerun with --force to seed anyway");
        return Ok(());
    }

    seed_categories(&database).await?;

    account_ids(
        &database,
        Role::Admin,
        std::iter::once(("Academy Admin", "admin@academy.local", None)),
        &args.password,
    )
    .await?;

    let instructor_accounts = account_ids(
        &database,
        Role::Instructor,
        INSTRUCTORS
            .iter()
            .map(|(name, email, bio)| (*name, *email, Some(*bio))),
        &args.password,
    )
    .await?;
    let mut instructor_ids = Vec::with_capacity(instructor_accounts.len());
    for account_id in instructor_accounts {
        let instructor = database
            .get_instructor_by_account(account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Instructor"))?;
        instructor_ids.push(instructor.instructor_id);
    }

    let student_accounts = account_ids(
        &database,
        Role::Student,
        STUDENTS.iter().map(|(name, email)| (*name, *email, None)),
        &args.password,
    )
    .await?;
    let mut student_ids = Vec::with_capacity(student_accounts.len());
    for account_id in student_accounts {
        student_ids.push(database.require_student_id(account_id).await?);
    }

    let course_ids = seed_courses(&database, &instructor_ids).await?;
    seed_activity(&database, &student_ids, &course_ids).await?;

    println!("Demo data ready in {url}");
    println!("Sign in as admin@academy.local, minh.anh@academy.local or thu.ha@academy.local");
    println!("Password for every account: {}", args.password);
    Ok(())
}
