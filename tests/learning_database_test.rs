// ABOUTME: Integration tests for enrollment, lecture progress, watchlist and reviews storage
// ABOUTME: Covers counter maintenance, progress rollup and rating recomputation on SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_listed_course, create_test_database, create_test_instructor, create_test_student};
use online_academy::errors::ErrorCode;
use online_academy::models::CourseStatus;

#[tokio::test]
async fn test_enroll_updates_counters_once() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Rust Basics", None, 2).await?;

    let enrollment = db.enroll(student_id, course.course_id).await?;
    assert_eq!(enrollment.progress, 0);
    assert!(db.is_enrolled(student_id, course.course_id).await?);

    let err = db.enroll(student_id, course.course_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    let course = db.get_course(course.course_id).await?.unwrap();
    assert_eq!(course.student_count, 1);
    let instructor = db.get_instructor(instructor.instructor_id).await?.unwrap();
    assert_eq!(instructor.total_students, 1);
    Ok(())
}

#[tokio::test]
async fn test_enroll_rejects_suspended_course() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Hidden", None, 1).await?;
    db.set_course_status(course.course_id, CourseStatus::Suspended)
        .await?;

    let err = db.enroll(student_id, course.course_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(!db.is_enrolled(student_id, course.course_id).await?);
    Ok(())
}

#[tokio::test]
async fn test_progress_rolls_up_per_lecture() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, lectures) =
        create_listed_course(&db, instructor.instructor_id, "Two Lectures", None, 2).await?;
    db.enroll(student_id, course.course_id).await?;

    let progress = db
        .complete_lecture(student_id, course.course_id, lectures[0])
        .await?;
    assert_eq!(progress, 50);

    // Completing the same lecture again changes nothing
    let progress = db
        .complete_lecture(student_id, course.course_id, lectures[0])
        .await?;
    assert_eq!(progress, 50);

    let progress = db
        .complete_lecture(student_id, course.course_id, lectures[1])
        .await?;
    assert_eq!(progress, 100);

    let enrollment = db.get_enrollment(student_id, course.course_id).await?.unwrap();
    assert_eq!(enrollment.progress, 100);
    assert_eq!(
        db.completed_lecture_ids(student_id, course.course_id).await?,
        lectures
    );
    Ok(())
}

#[tokio::test]
async fn test_marking_twice_counts_once_in_rollup() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, lectures) =
        create_listed_course(&db, instructor.instructor_id, "Six Lectures", None, 6).await?;
    db.enroll(student_id, course.course_id).await?;
    assert_eq!(db.update_course_progress(student_id, course.course_id).await?, 0);

    for lecture_id in &lectures[..3] {
        db.mark_lecture_complete(student_id, *lecture_id).await?;
        db.mark_lecture_complete(student_id, *lecture_id).await?;
    }
    assert_eq!(
        db.completed_lecture_ids(student_id, course.course_id).await?.len(),
        3
    );
    assert_eq!(db.update_course_progress(student_id, course.course_id).await?, 50);

    for lecture_id in &lectures[3..] {
        db.mark_lecture_complete(student_id, *lecture_id).await?;
    }
    assert_eq!(db.update_course_progress(student_id, course.course_id).await?, 100);
    let enrollment = db.get_enrollment(student_id, course.course_id).await?.unwrap();
    assert_eq!(enrollment.progress, 100);
    Ok(())
}

#[tokio::test]
async fn test_progress_of_empty_course_is_zero() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Empty", None, 0).await?;
    db.enroll(student_id, course.course_id).await?;

    assert_eq!(db.update_course_progress(student_id, course.course_id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_complete_lecture_requires_enrollment_and_matching_course() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (first, first_lectures) =
        create_listed_course(&db, instructor.instructor_id, "First", None, 1).await?;
    let (second, second_lectures) =
        create_listed_course(&db, instructor.instructor_id, "Second", None, 1).await?;

    let err = db
        .complete_lecture(student_id, first.course_id, first_lectures[0])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    db.enroll(student_id, first.course_id).await?;
    let err = db
        .complete_lecture(student_id, first.course_id, second_lectures[0])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(!db.is_enrolled(student_id, second.course_id).await?);
    Ok(())
}

#[tokio::test]
async fn test_watchlist_is_idempotent() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Saved", None, 1).await?;

    db.add_to_watchlist(student_id, course.course_id).await?;
    db.add_to_watchlist(student_id, course.course_id).await?;
    assert_eq!(db.list_watchlist(student_id).await?.len(), 1);
    assert!(db.is_in_watchlist(student_id, course.course_id).await?);

    assert!(db.remove_from_watchlist(student_id, course.course_id).await?);
    assert!(!db.remove_from_watchlist(student_id, course.course_id).await?);
    assert!(db.list_watchlist(student_id).await?.is_empty());

    let err = db.add_to_watchlist(student_id, 9999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_review_upsert_recomputes_star() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, alice) = create_test_student(&db, "alice@example.com").await?;
    let (_, bob) = create_test_student(&db, "bob@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Rated", None, 1).await?;

    let err = db
        .upsert_review(alice, course.course_id, 5, "Great")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    db.enroll(alice, course.course_id).await?;
    db.enroll(bob, course.course_id).await?;

    db.upsert_review(alice, course.course_id, 5, "Great").await?;
    db.upsert_review(bob, course.course_id, 4, "Good").await?;
    let course_row = db.get_course(course.course_id).await?.unwrap();
    assert!((course_row.star - 4.5).abs() < f64::EPSILON);

    // A second review from the same student replaces the first
    let review = db
        .upsert_review(alice, course.course_id, 2, "  Changed my mind  ")
        .await?;
    assert_eq!(review.rating, 2);
    assert_eq!(review.feedback, "Changed my mind");
    assert_eq!(db.list_reviews_for_course(course.course_id).await?.len(), 2);

    let course_row = db.get_course(course.course_id).await?.unwrap();
    assert!((course_row.star - 3.0).abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_review_rejects_out_of_range_rating() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Rated", None, 1).await?;
    db.enroll(student_id, course.course_id).await?;

    for rating in [0, 6] {
        let err = db
            .upsert_review(student_id, course.course_id, rating, "Fine")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
    assert!(db.get_review(student_id, course.course_id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_enrollments_list_marks_watchlist() -> Result<()> {
    let db = create_test_database().await?;
    let (_, instructor) = create_test_instructor(&db, "instructor@example.com").await?;
    let (_, student_id) = create_test_student(&db, "learner@example.com").await?;
    let (course, _) = create_listed_course(&db, instructor.instructor_id, "Listed", None, 1).await?;
    db.enroll(student_id, course.course_id).await?;
    db.add_to_watchlist(student_id, course.course_id).await?;

    let enrolled = db.list_enrollments_for_student(student_id).await?;
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].course.course_id, course.course_id);
    assert!(enrolled[0].in_watchlist);
    Ok(())
}
