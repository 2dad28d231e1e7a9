// ABOUTME: Integration tests for categories, course lifecycle, catalog rankings and search
// ABOUTME: Exercises category rules, cascading course deletion and the trigram search over SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{
    course_input, create_listed_course, create_test_categories, create_test_database,
    create_test_instructor, create_test_student,
};
use online_academy::errors::ErrorCode;
use online_academy::models::CourseStatus;
use online_academy::search::{search_courses, SearchQuery};

#[tokio::test]
async fn test_category_tree_groups_children() -> Result<()> {
    let db = create_test_database().await?;
    let (parent, child) = create_test_categories(&db).await?;
    db.create_category("Design", None).await?;

    let tree = db.category_tree().await?;
    assert_eq!(tree.len(), 2);
    let development = tree
        .iter()
        .find(|node| node.category.category_id == parent.category_id)
        .unwrap();
    assert_eq!(development.children.len(), 1);
    assert_eq!(development.children[0].category_id, child.category_id);
    Ok(())
}

#[tokio::test]
async fn test_category_rules() -> Result<()> {
    let db = create_test_database().await?;
    let (parent, child) = create_test_categories(&db).await?;

    // Only two levels deep
    let err = db
        .create_category("Too Deep", Some(child.category_id))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = db.create_category("Development", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    let err = db.delete_category(parent.category_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    db.rename_category(child.category_id, "Frontend").await?;
    assert_eq!(
        db.get_category(child.category_id).await?.unwrap().name,
        "Frontend"
    );

    let err = db.delete_category(9999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_category_with_courses_cannot_be_deleted() -> Result<()> {
    let db = create_test_database().await?;
    let (_, child) = create_test_categories(&db).await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    create_listed_course(
        &db,
        instructor.instructor_id,
        "HTML and CSS",
        Some(child.category_id),
        1,
    )
    .await?;

    let err = db.delete_category(child.category_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.message.contains("linked course"));
    Ok(())
}

#[tokio::test]
async fn test_new_course_starts_incomplete_with_totals() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;

    let course = db
        .create_course(instructor.instructor_id, course_input("Draft", None))
        .await?;
    assert_eq!(course.status, CourseStatus::Incomplete);
    assert_eq!(course.total_lectures, 0);

    let err = db
        .create_course(instructor.instructor_id, course_input("Ghost", Some(777)))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let (listed, _) = create_listed_course(&db, instructor.instructor_id, "Six Lectures", None, 6).await?;
    assert_eq!(listed.total_lectures, 6);
    assert!((listed.total_hours - 1.0).abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_delete_course_cascades_and_adjusts_counters() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, lectures) =
        create_listed_course(&db, instructor.instructor_id, "Doomed", None, 2).await?;
    let (kept, _) = create_listed_course(&db, instructor.instructor_id, "Kept", None, 1).await?;

    db.enroll(student_id, course.course_id).await?;
    db.enroll(student_id, kept.course_id).await?;
    db.complete_lecture(student_id, course.course_id, lectures[0])
        .await?;
    db.upsert_review(student_id, course.course_id, 4, "Solid").await?;
    db.add_to_watchlist(student_id, course.course_id).await?;
    db.record_course_view(course.course_id).await?;

    db.delete_course(course.course_id).await?;

    assert!(db.get_course(course.course_id).await?.is_none());
    assert!(!db.is_enrolled(student_id, course.course_id).await?);
    assert!(db.list_watchlist(student_id).await?.is_empty());
    assert!(db.list_reviews_by_student(student_id).await?.is_empty());
    assert_eq!(db.list_enrollments_for_student(student_id).await?.len(), 1);

    let instructor = db.get_instructor(instructor.instructor_id).await?.unwrap();
    assert_eq!(instructor.total_students, 1);

    let err = db.delete_course(course.course_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_failed_delete_leaves_course_intact() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, lectures) =
        create_listed_course(&db, instructor.instructor_id, "Sturdy", None, 2).await?;
    db.enroll(student_id, course.course_id).await?;
    db.complete_lecture(student_id, course.course_id, lectures[0])
        .await?;
    db.add_to_watchlist(student_id, course.course_id).await?;
    db.add_course_image(course.course_id, "https://img.example.com/1.png", None)
        .await?;

    // Images are removed late in the cascade, after lectures and enrollments
    sqlx::query(
        "CREATE TRIGGER lock_images BEFORE DELETE ON course_images \
         BEGIN SELECT RAISE(ABORT, 'images are locked'); END",
    )
    .execute(db.pool())
    .await?;

    let err = db.delete_course(course.course_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    assert!(db.get_course(course.course_id).await?.is_some());
    let sections = db.list_sections(course.course_id).await?;
    assert_eq!(sections[0].lectures.len(), 2);
    assert!(db.is_enrolled(student_id, course.course_id).await?);
    assert_eq!(
        db.completed_lecture_ids(student_id, course.course_id).await?,
        vec![lectures[0]]
    );
    assert!(db.is_in_watchlist(student_id, course.course_id).await?);
    let unchanged = db.get_instructor(instructor.instructor_id).await?.unwrap();
    assert_eq!(unchanged.total_students, 1);

    sqlx::query("DROP TRIGGER lock_images").execute(db.pool()).await?;
    db.delete_course(course.course_id).await?;
    assert!(db.get_course(course.course_id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_instructor_cannot_delete_someone_elses_course() -> Result<()> {
    let db = create_test_database().await?;
    let (_, owner) = create_test_instructor(&db, "owner@example.com").await?;
    let (_, other) = create_test_instructor(&db, "other@example.com").await?;
    let (course, _) = create_listed_course(&db, owner.instructor_id, "Mine", None, 1).await?;

    let err = db
        .delete_instructor_course(course.course_id, other.instructor_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(db.get_course(course.course_id).await?.is_some());

    db.delete_instructor_course(course.course_id, owner.instructor_id)
        .await?;
    assert!(db.get_course(course.course_id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_suspended_courses_leave_public_lists() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (visible, _) = create_listed_course(&db, instructor.instructor_id, "Visible", None, 1).await?;
    let (hidden, _) = create_listed_course(&db, instructor.instructor_id, "Hidden", None, 1).await?;
    db.set_bestseller(visible.course_id, true).await?;
    db.set_bestseller(hidden.course_id, true).await?;
    db.set_course_status(hidden.course_id, CourseStatus::Suspended)
        .await?;

    let ids = |cards: Vec<online_academy::models::CourseCard>| {
        cards.into_iter().map(|c| c.course_id).collect::<Vec<_>>()
    };
    assert_eq!(ids(db.listed_courses().await?), vec![visible.course_id]);
    assert_eq!(ids(db.newest_courses(10).await?), vec![visible.course_id]);
    assert_eq!(ids(db.best_sellers(10, None).await?), vec![visible.course_id]);
    assert_eq!(ids(db.best_sellers(10, Some("all")).await?), vec![visible.course_id]);

    // Administrators still see everything
    assert_eq!(db.list_all_courses().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_views_drive_top_viewed() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (quiet, _) = create_listed_course(&db, instructor.instructor_id, "Quiet", None, 1).await?;
    let (busy, _) = create_listed_course(&db, instructor.instructor_id, "Busy", None, 1).await?;

    for _ in 0..3 {
        db.record_course_view(busy.course_id).await?;
    }
    db.record_course_view(quiet.course_id).await?;

    let top = db.top_viewed_courses(10).await?;
    assert_eq!(top[0].course_id, busy.course_id);
    assert_eq!(top[0].view_count, 3);

    let weekly = db.weekly_highlights(1).await?;
    assert_eq!(weekly[0].course_id, busy.course_id);

    let err = db.record_course_view(9999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_search_matches_titles_and_categories() -> Result<()> {
    let db = create_test_database().await?;
    let (_, child) = create_test_categories(&db).await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (js, _) = create_listed_course(
        &db,
        instructor.instructor_id,
        "JavaScript Basics",
        Some(child.category_id),
        1,
    )
    .await?;
    create_listed_course(&db, instructor.instructor_id, "Watercolor Painting", None, 1).await?;

    let response = search_courses(&db, &SearchQuery::new(Some("javascript"), None, None)).await?;
    assert_eq!(response.total, 1);
    assert_eq!(response.courses[0].course.course_id, js.course_id);

    // Misspelled title still matches by trigram similarity
    let response = search_courses(&db, &SearchQuery::new(Some("javascrpt"), None, None)).await?;
    assert_eq!(response.total, 1);

    let response = search_courses(&db, &SearchQuery::new(Some("web development"), None, None)).await?;
    assert_eq!(response.total, 1);

    let response = search_courses(&db, &SearchQuery::new(Some(""), None, None)).await?;
    assert_eq!(response.total, 2);
    assert_eq!(response.total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn test_admin_counts_and_instructor_stats() -> Result<()> {
    let db = create_test_database().await?;
    create_test_categories(&db).await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Counted", None, 3).await?;
    db.enroll(student_id, course.course_id).await?;

    let counts = db.admin_counts().await?;
    assert_eq!(counts.categories, 2);
    assert_eq!(counts.courses, 1);
    assert_eq!(counts.instructors, 1);
    assert_eq!(counts.students, 1);

    let stats = db.instructor_stats(instructor.instructor_id).await?;
    assert_eq!(stats.total_courses, 1);
    assert_eq!(stats.completed_courses, 1);
    assert_eq!(stats.total_lectures, 3);
    assert_eq!(stats.total_students, 1);
    Ok(())
}
