// ABOUTME: Enrollment JSON endpoints called by the enroll button and progress widgets
// ABOUTME: Unauthenticated calls get 401 JSON, non-students 403, duplicates 409
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::auth::extractors::ApiStudent;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Enroll result for the detail page script
#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    /// Always true; failures use the error envelope
    pub success: bool,
    /// Message to show
    pub message: String,
    /// Where to go next
    pub redirect: String,
    /// Starting progress
    pub progress: u8,
}

/// Progress of one enrollment
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// Course
    pub course_id: i64,
    /// Percentage 0..=100
    pub progress: u8,
    /// Completed lecture ids
    pub completed_lectures: Vec<i64>,
}

/// Enrollment routes
pub struct EnrollmentRoutes;

impl EnrollmentRoutes {
    /// Create enrollment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/enrollment/:course_id/enroll", post(Self::handle_enroll))
            .route("/enrollment/:course_id/progress", get(Self::handle_progress))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources, student), fields(route = "enroll"))]
    async fn handle_enroll(
        State(resources): State<Arc<ServerResources>>,
        student: ApiStudent,
        Path(course_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let enrollment = resources
            .database
            .enroll(student.student_id, course_id)
            .await?;
        info!(
            account_id = student.user.account_id,
            course_id, "Enrollment created"
        );
        Ok((
            StatusCode::CREATED,
            Json(EnrollResponse {
                success: true,
                message: "You are now enrolled. Happy learning!".to_owned(),
                redirect: format!("/learn/{course_id}"),
                progress: enrollment.progress,
            }),
        )
            .into_response())
    }

    #[tracing::instrument(skip(resources, student), fields(route = "enrollment_progress"))]
    async fn handle_progress(
        State(resources): State<Arc<ServerResources>>,
        student: ApiStudent,
        Path(course_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let enrollment = resources
            .database
            .get_enrollment(student.student_id, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Enrollment"))?;
        let completed_lectures = resources
            .database
            .completed_lecture_ids(student.student_id, course_id)
            .await?;
        Ok(Json(ProgressResponse {
            course_id,
            progress: enrollment.progress,
            completed_lectures,
        })
        .into_response())
    }
}
