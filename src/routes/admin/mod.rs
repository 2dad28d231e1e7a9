// ABOUTME: Admin area router and dashboard handler
// ABOUTME: Category, course and user management handlers live in submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Admin routes
//!
//! Every handler takes [`RequireAdmin`], so non-admin sessions are redirected
//! before any data is loaded. Mutations redirect back to their list page with
//! a `?notice=` or `?error=` banner.

mod categories;
mod courses;
mod users;

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::auth::extractors::RequireAdmin;
use crate::errors::PageResult;
use crate::resources::ServerResources;
use crate::views;

/// Admin area routes
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/admin", get(handle_dashboard))
            .route(
                "/admin/categories",
                get(categories::handle_list).post(categories::handle_create),
            )
            .route("/admin/categories/:id/update", post(categories::handle_rename))
            .route("/admin/categories/:id/delete", post(categories::handle_delete))
            .route("/admin/courses", get(courses::handle_list))
            .route("/admin/courses/:id/delete", post(courses::handle_delete))
            .route("/admin/courses/:id/status", post(courses::handle_set_status))
            .route("/admin/users", get(users::handle_list))
            .route("/admin/instructors", post(users::handle_create_instructor))
            .with_state(resources)
    }
}

#[tracing::instrument(skip(resources, admin), fields(route = "admin_dashboard"))]
async fn handle_dashboard(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(admin): RequireAdmin,
) -> PageResult<Response> {
    let counts = resources.database.admin_counts().await?;
    Ok(Html(views::admin::dashboard_page(&admin, &counts)).into_response())
}
