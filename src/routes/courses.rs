// ABOUTME: Course routes: paginated listing, detail page, detail JSON for the modal, watchlist toggles
// ABOUTME: Every detail view is logged for the weekly highlights and view counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::extractors::{MaybeUser, RequireStudent};
use crate::auth::session::SessionUser;
use crate::constants::catalog;
use crate::errors::{AppError, AppResult, PageResult};
use crate::models::{CourseDetails, Role};
use crate::resources::ServerResources;
use crate::views::{self, course::ViewerState};

/// `?page=` on listings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<i64>,
}

/// Number of pages needed for `total` items
#[must_use]
pub const fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

/// Course catalog routes
pub struct CourseRoutes;

impl CourseRoutes {
    /// Create course routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/courses", get(Self::handle_list))
            .route("/courses/detail/:id", get(Self::handle_detail_json))
            .route("/courses/:id", get(Self::handle_detail_page))
            .route("/courses/:id/favorite", post(Self::handle_favorite))
            .route("/courses/:id/unfavorite", post(Self::handle_unfavorite))
            .with_state(resources)
    }

    /// Load details a viewer may see; suspended courses are visible to admins only
    async fn visible_details(
        resources: &ServerResources,
        course_id: i64,
        user: Option<&SessionUser>,
    ) -> AppResult<CourseDetails> {
        let details = resources
            .database
            .course_details(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))?;
        let is_admin = user.is_some_and(|u| u.role == Role::Admin);
        if !details.course.status.is_listed() && !is_admin {
            debug!(course_id, "Suspended course hidden");
            return Err(AppError::not_found("Course"));
        }
        Ok(details)
    }

    #[tracing::instrument(skip(resources, user, query), fields(route = "course_list"))]
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
        Query(query): Query<PageQuery>,
    ) -> PageResult<Response> {
        let page = query.page.unwrap_or(1).max(1);
        let (courses, total) = resources
            .database
            .list_courses_page(page, catalog::LIST_PAGE_SIZE)
            .await?;
        let tree = resources.database.category_tree().await?;
        Ok(Html(views::catalog::course_list_page(
            user.as_ref(),
            &courses,
            page,
            total_pages(total, catalog::LIST_PAGE_SIZE),
            &tree,
        ))
        .into_response())
    }

    #[tracing::instrument(skip(resources, user), fields(route = "course_detail_json"))]
    async fn handle_detail_json(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
        Path(course_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let details = Self::visible_details(&resources, course_id, user.as_ref()).await?;
        resources.database.record_course_view(course_id).await?;
        Ok(Json(details).into_response())
    }

    #[tracing::instrument(skip(resources, user), fields(route = "course_detail"))]
    async fn handle_detail_page(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
        Path(course_id): Path<i64>,
    ) -> PageResult<Response> {
        let details = Self::visible_details(&resources, course_id, user.as_ref()).await?;
        resources.database.record_course_view(course_id).await?;

        let mut viewer = ViewerState::default();
        if let Some(user) = user.as_ref().filter(|u| u.role == Role::Student) {
            if let Some(student) = resources
                .database
                .get_student_by_account(user.account_id)
                .await?
            {
                viewer.enrolled = resources
                    .database
                    .is_enrolled(student.student_id, course_id)
                    .await?;
                viewer.in_watchlist = resources
                    .database
                    .is_in_watchlist(student.student_id, course_id)
                    .await?;
            }
        }

        Ok(Html(views::course::detail_page(user.as_ref(), &details, viewer)).into_response())
    }

    #[tracing::instrument(skip(resources, student), fields(route = "favorite"))]
    async fn handle_favorite(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
        Path(course_id): Path<i64>,
    ) -> PageResult<Response> {
        resources
            .database
            .add_to_watchlist(student.student_id, course_id)
            .await?;
        info!(student_id = student.student_id, course_id, "Course saved to watchlist");
        Ok(Redirect::to(&format!("/courses/{course_id}")).into_response())
    }

    #[tracing::instrument(skip(resources, student), fields(route = "unfavorite"))]
    async fn handle_unfavorite(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
        Path(course_id): Path<i64>,
    ) -> PageResult<Response> {
        resources
            .database
            .remove_from_watchlist(student.student_id, course_id)
            .await?;
        Ok(Redirect::to(&format!("/courses/{course_id}")).into_response())
    }
}
