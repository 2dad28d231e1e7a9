// ABOUTME: Home page route with weekly highlights, most viewed, newest and popular courses
// ABOUTME: Also serves the client script and placeholder image under /static
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::auth::extractors::MaybeUser;
use crate::constants::catalog;
use crate::errors::PageResult;
use crate::resources::ServerResources;
use crate::views::{self, assets, catalog::HomeSections};

/// Home page and static asset routes
pub struct HomeRoutes;

impl HomeRoutes {
    /// Create home routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_home))
            .route("/home", get(|| async { Redirect::to("/") }))
            .route("/static/app.js", get(Self::handle_script))
            .route("/static/placeholder.svg", get(Self::handle_placeholder))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources, user), fields(route = "home"))]
    async fn handle_home(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
    ) -> PageResult<Response> {
        let db = &resources.database;
        let sections = HomeSections {
            weekly: db.weekly_highlights(catalog::HOME_SECTION_SIZE).await?,
            top_viewed: db.top_viewed_courses(catalog::HOME_SECTION_SIZE).await?,
            newest: db.newest_courses(catalog::HOME_SECTION_SIZE).await?,
            popular: db.popular_courses(catalog::HOME_SECTION_SIZE).await?,
            top_categories: db.top_categories(catalog::HOME_CATEGORY_COUNT).await?,
            trending_categories: db
                .top_categories_by_weekly_enrollment(catalog::HOME_CATEGORY_COUNT)
                .await?,
        };
        Ok(Html(views::catalog::home_page(user.as_ref(), &sections)).into_response())
    }

    async fn handle_script() -> Response {
        (
            [
                (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            assets::APP_JS,
        )
            .into_response()
    }

    async fn handle_placeholder() -> Response {
        (
            [
                (header::CONTENT_TYPE, "image/svg+xml"),
                (header::CACHE_CONTROL, "public, max-age=86400"),
            ],
            assets::PLACEHOLDER_SVG,
        )
            .into_response()
    }
}
