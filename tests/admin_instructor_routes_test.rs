// ABOUTME: HTTP tests for the role-gated admin and instructor areas
// ABOUTME: Covers guards, category and course administration, and the course editor workflow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use anyhow::Result;
use axum::http::StatusCode;

use common::{
    create_listed_course, create_test_admin, create_test_categories, create_test_instructor,
    create_test_resources, create_test_student, session_for,
};
use helpers::axum_test::AxumTestRequest;
use online_academy::models::{CourseStatus, Role};
use online_academy::server::AcademyServer;

#[tokio::test]
async fn test_admin_area_guard() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let db = &resources.database;
    let (student, _) = create_test_student(db, "learner@example.com").await?;
    let (instructor, _) = create_test_instructor(db, "instructor@example.com").await?;
    let admin = create_test_admin(db, "admin@example.com").await?;
    let app = AcademyServer::new(resources.clone()).app();

    let anonymous = AxumTestRequest::get("/admin").send(app.clone()).await;
    assert_eq!(anonymous.status_code(), StatusCode::SEE_OTHER);
    assert!(anonymous.location().unwrap().starts_with("/auth/login"));

    let as_student = AxumTestRequest::get("/admin")
        .session(Some(&session_for(&resources, &student)))
        .send(app.clone())
        .await;
    assert_eq!(as_student.location().as_deref(), Some("/"));

    let as_instructor = AxumTestRequest::get("/admin")
        .session(Some(&session_for(&resources, &instructor)))
        .send(app.clone())
        .await;
    assert_eq!(as_instructor.location().as_deref(), Some("/instructor"));

    let as_admin = AxumTestRequest::get("/admin")
        .session(Some(&session_for(&resources, &admin)))
        .send(app)
        .await;
    assert_eq!(as_admin.status_code(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_instructor_area_refuses_students() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let (student, _) = create_test_student(&resources.database, "learner@example.com").await?;
    let app = AcademyServer::new(resources.clone()).app();

    let response = AxumTestRequest::get("/instructor/dashboard")
        .session(Some(&session_for(&resources, &student)))
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.location().as_deref(), Some("/"));
    Ok(())
}

#[tokio::test]
async fn test_admin_manages_categories() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let db = &resources.database;
    let admin = create_test_admin(db, "admin@example.com").await?;
    let (parent, _) = create_test_categories(db).await?;
    let token = session_for(&resources, &admin);
    let app = AcademyServer::new(resources.clone()).app();

    let created = AxumTestRequest::post("/admin/categories")
        .session(Some(&token))
        .form(&[("name", "Mobile"), ("parent_id", "")])
        .send(app.clone())
        .await;
    assert!(created.location().unwrap().contains("notice="));
    let mobile = db.get_category_by_name("Mobile").await?.unwrap();
    assert!(mobile.parent_id.is_none());

    let renamed = AxumTestRequest::post(&format!("/admin/categories/{}/update", mobile.category_id))
        .session(Some(&token))
        .form(&[("name", "Mobile Apps")])
        .send(app.clone())
        .await;
    assert!(renamed.location().unwrap().contains("notice="));

    let refused = AxumTestRequest::post(&format!("/admin/categories/{}/delete", parent.category_id))
        .session(Some(&token))
        .send(app.clone())
        .await;
    assert!(refused.location().unwrap().contains("error="));
    assert!(db.get_category(parent.category_id).await?.is_some());

    let deleted = AxumTestRequest::post(&format!("/admin/categories/{}/delete", mobile.category_id))
        .session(Some(&token))
        .send(app.clone())
        .await;
    assert!(deleted.location().unwrap().contains("notice="));
    assert!(db.get_category(mobile.category_id).await?.is_none());

    let page = AxumTestRequest::get("/admin/categories")
        .session(Some(&token))
        .send(app)
        .await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("Web Development"));
    Ok(())
}

#[tokio::test]
async fn test_admin_suspends_and_deletes_courses() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let db = &resources.database;
    let admin = create_test_admin(db, "admin@example.com").await?;
    let (_, instructor) = create_test_instructor(db, "instructor@example.com").await?;
    let (course, _) = create_listed_course(db, instructor.instructor_id, "Moderated", None, 1).await?;
    let token = session_for(&resources, &admin);
    let app = AcademyServer::new(resources.clone()).app();
    let status_path = format!("/admin/courses/{}/status", course.course_id);

    AxumTestRequest::post(&status_path)
        .session(Some(&token))
        .form(&[("status", "suspended")])
        .send(app.clone())
        .await;
    assert_eq!(
        db.get_course(course.course_id).await?.unwrap().status,
        CourseStatus::Suspended
    );

    // Authoring states belong to the instructor
    let refused = AxumTestRequest::post(&status_path)
        .session(Some(&token))
        .form(&[("status", "complete")])
        .send(app.clone())
        .await;
    assert!(refused.location().unwrap().contains("error="));

    let listing = AxumTestRequest::get("/admin/courses")
        .session(Some(&token))
        .send(app.clone())
        .await;
    assert!(listing.text().contains("Moderated"));

    AxumTestRequest::post(&format!("/admin/courses/{}/delete", course.course_id))
        .session(Some(&token))
        .send(app)
        .await;
    assert!(db.get_course(course.course_id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_admin_creates_instructor_account() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let db = &resources.database;
    let admin = create_test_admin(db, "admin@example.com").await?;
    let token = session_for(&resources, &admin);
    let app = AcademyServer::new(resources.clone()).app();

    let created = AxumTestRequest::post("/admin/instructors")
        .session(Some(&token))
        .form(&[
            ("full_name", "Tran Thi B"),
            ("email", "tran.b@example.com"),
            ("password", "Teaching2025"),
            ("bio", "Data engineer"),
        ])
        .send(app.clone())
        .await;
    assert!(created.location().unwrap().contains("notice="));

    let account = db.get_account_by_email("tran.b@example.com").await?.unwrap();
    assert_eq!(account.role, Role::Instructor);
    assert!(account.is_verified);
    let profile = db.get_instructor_by_account(account.account_id).await?.unwrap();
    assert_eq!(profile.bio.as_deref(), Some("Data engineer"));

    let duplicate = AxumTestRequest::post("/admin/instructors")
        .session(Some(&token))
        .form(&[
            ("full_name", "Tran Thi B"),
            ("email", "tran.b@example.com"),
            ("password", "Teaching2025"),
            ("bio", ""),
        ])
        .send(app.clone())
        .await;
    assert!(duplicate.location().unwrap().contains("error="));

    let users = AxumTestRequest::get("/admin/users")
        .session(Some(&token))
        .send(app)
        .await;
    assert!(users.text().contains("tran.b@example.com"));
    Ok(())
}

#[tokio::test]
async fn test_instructor_builds_a_course() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let db = &resources.database;
    let (_, child) = create_test_categories(db).await?;
    let (account, instructor) = create_test_instructor(db, "instructor@example.com").await?;
    let token = session_for(&resources, &account);
    let app = AcademyServer::new(resources.clone()).app();
    let category_id = child.category_id.to_string();

    let invalid = AxumTestRequest::post("/instructor/courses/new")
        .session(Some(&token))
        .form(&[("title", ""), ("current_price", "100")])
        .send(app.clone())
        .await;
    assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let created = AxumTestRequest::post("/instructor/courses/new")
        .session(Some(&token))
        .form(&[
            ("title", "Async Rust"),
            ("description", "Futures and executors"),
            ("detail_html", "<p>Hands-on</p>"),
            ("image_url", ""),
            ("current_price", "250000"),
            ("original_price", ""),
            ("category_id", category_id.as_str()),
        ])
        .send(app.clone())
        .await;
    assert_eq!(created.status_code(), StatusCode::SEE_OTHER);
    let location = created.location().unwrap();
    assert!(location.starts_with("/instructor/courses/"));

    let courses = db.list_instructor_courses(instructor.instructor_id).await?;
    assert_eq!(courses.len(), 1);
    let course_id = courses[0].course_id;
    let course = db.get_course(course_id).await?.unwrap();
    assert_eq!(course.original_price, 250_000);
    assert_eq!(course.status, CourseStatus::Incomplete);

    AxumTestRequest::post(&format!("/instructor/courses/{course_id}/sections"))
        .session(Some(&token))
        .form(&[("title", "Getting started")])
        .send(app.clone())
        .await;
    let sections = db.list_sections(course_id).await?;
    assert_eq!(sections.len(), 1);

    let course_field = course_id.to_string();
    let added = AxumTestRequest::post(&format!(
        "/instructor/sections/{}/lectures",
        sections[0].section_id
    ))
    .session(Some(&token))
    .form(&[
        ("course_id", course_field.as_str()),
        ("title", "Why async"),
        ("video_url", "https://videos.example.com/1.mp4"),
        ("duration_minutes", "12.5"),
        ("is_preview", "true"),
    ])
    .send(app.clone())
    .await;
    assert!(added
        .location()
        .unwrap()
        .starts_with(&format!("/instructor/courses/{course_id}/edit")));

    let sections = db.list_sections(course_id).await?;
    let lecture = &sections[0].lectures[0];
    assert_eq!(lecture.duration_seconds, 750);
    assert!(lecture.is_preview);

    let editor = AxumTestRequest::get(&format!("/instructor/courses/{course_id}/edit"))
        .session(Some(&token))
        .send(app)
        .await;
    assert_eq!(editor.status_code(), StatusCode::OK);
    assert!(editor.text().contains("Why async"));
    Ok(())
}

#[tokio::test]
async fn test_instructor_cannot_edit_foreign_course() -> Result<()> {
    let (resources, _) = create_test_resources().await?;
    let db = &resources.database;
    let (_, owner) = create_test_instructor(db, "owner@example.com").await?;
    let (intruder, _) = create_test_instructor(db, "intruder@example.com").await?;
    let (course, _) = create_listed_course(db, owner.instructor_id, "Private", None, 1).await?;
    let token = session_for(&resources, &intruder);
    let app = AcademyServer::new(resources.clone()).app();

    let editor = AxumTestRequest::get(&format!("/instructor/courses/{}/edit", course.course_id))
        .session(Some(&token))
        .send(app.clone())
        .await;
    assert_eq!(editor.status_code(), StatusCode::NOT_FOUND);

    let delete = AxumTestRequest::post(&format!("/instructor/courses/{}/delete", course.course_id))
        .session(Some(&token))
        .send(app)
        .await;
    assert!(delete.location().unwrap().contains("error="));
    assert!(db.get_course(course.course_id).await?.is_some());
    Ok(())
}
