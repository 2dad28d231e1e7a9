// ABOUTME: Learning routes: the course player page, lecture completion JSON and review submission
// ABOUTME: Only enrolled students reach the player; others are sent to the course page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{redirect_notice, redirect_on_error};
use crate::auth::extractors::{ApiStudent, RequireStudent};
use crate::errors::{AppError, PageResult};
use crate::models::{CourseDetails, Lecture};
use crate::resources::ServerResources;
use crate::views::{self, learn::LearnState, Flash};

/// `?lecture=` on the player page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LectureQuery {
    /// Lecture to open
    pub lecture: Option<i64>,
}

/// Review form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    /// 1..=5, as submitted
    pub rating: String,
    /// Review text
    pub feedback: String,
}

/// Completion result
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    /// Course
    pub course_id: i64,
    /// Lecture just completed
    pub lecture_id: i64,
    /// New course progress
    pub progress: u8,
}

/// Requested lecture, else the first unfinished one, else the first
fn pick_lecture<'a>(
    details: &'a CourseDetails,
    requested: Option<i64>,
    completed: &HashSet<i64>,
) -> Option<&'a Lecture> {
    if let Some(id) = requested {
        if let Some(lecture) = details.lectures().find(|l| l.lecture_id == id) {
            return Some(lecture);
        }
    }
    details
        .lectures()
        .find(|l| !completed.contains(&l.lecture_id))
        .or_else(|| details.lectures().next())
}

/// Learning routes
pub struct LearnRoutes;

impl LearnRoutes {
    /// Create learning routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/learn/:course_id", get(Self::handle_learn))
            .route(
                "/learn/:course_id/lectures/:lecture_id/complete",
                post(Self::handle_complete),
            )
            .route("/learn/:course_id/review", post(Self::handle_review))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources, student, query, flash), fields(route = "learn"))]
    async fn handle_learn(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
        Path(course_id): Path<i64>,
        Query(query): Query<LectureQuery>,
        Query(flash): Query<Flash>,
    ) -> PageResult<Response> {
        let db = &resources.database;
        let Some(enrollment) = db.get_enrollment(student.student_id, course_id).await? else {
            return Ok(Redirect::to(&format!("/courses/{course_id}")).into_response());
        };
        let details = db
            .course_details(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))?;
        let completed: HashSet<i64> = db
            .completed_lecture_ids(student.student_id, course_id)
            .await?
            .into_iter()
            .collect();
        let review = db.get_review(student.student_id, course_id).await?;

        let state = LearnState {
            completed: &completed,
            progress: enrollment.progress,
            current: pick_lecture(&details, query.lecture, &completed),
            review: review.as_ref(),
        };
        Ok(Html(views::learn::learn_page(&student.user, &details, &state, &flash)).into_response())
    }

    #[tracing::instrument(skip(resources, student), fields(route = "complete_lecture"))]
    async fn handle_complete(
        State(resources): State<Arc<ServerResources>>,
        student: ApiStudent,
        Path((course_id, lecture_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let progress = resources
            .database
            .complete_lecture(student.student_id, course_id, lecture_id)
            .await?;
        info!(student_id = student.student_id, course_id, lecture_id, progress, "Lecture completed");
        Ok(Json(CompleteResponse {
            course_id,
            lecture_id,
            progress,
        })
        .into_response())
    }

    #[tracing::instrument(skip(resources, student, form), fields(route = "review"))]
    async fn handle_review(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
        Path(course_id): Path<i64>,
        Form(form): Form<ReviewForm>,
    ) -> PageResult<Response> {
        let back = format!("/learn/{course_id}");
        let Ok(rating) = form.rating.trim().parse::<i64>() else {
            return redirect_on_error(&back, AppError::invalid_input("Please choose a rating"));
        };
        match resources
            .database
            .upsert_review(student.student_id, course_id, rating, &form.feedback)
            .await
        {
            Ok(_) => Ok(redirect_notice(&back, "Thanks for your review!")),
            Err(e) => redirect_on_error(&back, e),
        }
    }
}
