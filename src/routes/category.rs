// ABOUTME: Category routes: the category page and the JSON feed behind the home page filter
// ABOUTME: Names are matched case-insensitively; a subject area includes its subcategories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::auth::extractors::MaybeUser;
use crate::constants::catalog;
use crate::errors::{AppError, AppResult, PageResult};
use crate::models::CourseCard;
use crate::resources::ServerResources;
use crate::views;

/// JSON body of `/category/api/:name`
#[derive(Debug, Serialize)]
pub struct CategoryCourses {
    /// Requested category, `all` for no filter
    pub category: String,
    /// Courses to show
    pub courses: Vec<CourseCard>,
}

/// Category routes
pub struct CategoryRoutes;

impl CategoryRoutes {
    /// Create category routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/category/api/:name", get(Self::handle_api))
            .route("/category/:name", get(Self::handle_page))
            .with_state(resources)
    }

    /// Bestsellers of the category; categories without bestsellers show their top courses
    async fn filter_courses(resources: &ServerResources, name: &str) -> AppResult<Vec<CourseCard>> {
        let limit = catalog::HOME_SECTION_SIZE;
        let best = resources.database.best_sellers(limit, Some(name)).await?;
        if !best.is_empty() {
            return Ok(best);
        }
        if name.eq_ignore_ascii_case("all") {
            return resources.database.popular_courses(limit).await;
        }
        let mut courses = resources.database.courses_by_category_name(name).await?;
        courses.sort_by(|a, b| b.student_count.cmp(&a.student_count));
        courses.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(courses)
    }

    #[tracing::instrument(skip(resources), fields(route = "category_api"))]
    async fn handle_api(
        State(resources): State<Arc<ServerResources>>,
        Path(name): Path<String>,
    ) -> Result<Response, AppError> {
        let name = name.trim().to_owned();
        let courses = Self::filter_courses(&resources, &name).await?;
        Ok(Json(CategoryCourses {
            category: name,
            courses,
        })
        .into_response())
    }

    #[tracing::instrument(skip(resources, user), fields(route = "category_page"))]
    async fn handle_page(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
        Path(name): Path<String>,
    ) -> PageResult<Response> {
        let category = resources
            .database
            .get_category_by_name(name.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;
        let courses = resources
            .database
            .courses_by_category_name(&category.name)
            .await?;
        let tree = resources.database.category_tree().await?;
        Ok(Html(views::catalog::category_page(
            user.as_ref(),
            &category.name,
            &courses,
            &tree,
        ))
        .into_response())
    }
}
