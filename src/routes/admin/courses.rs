// ABOUTME: Admin course handlers: full course list, suspend/activate, delete with cascade
// ABOUTME: Suspended courses disappear from the catalog but keep their enrollments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::auth::extractors::RequireAdmin;
use crate::errors::{AppError, PageResult};
use crate::models::CourseStatus;
use crate::resources::ServerResources;
use crate::routes::{redirect_notice, redirect_on_error};
use crate::views::{self, Flash};

const PAGE: &str = "/admin/courses";

/// Status change form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct StatusForm {
    /// `suspended` or `active`
    status: String,
}

/// Only suspend and activate are administrative actions
fn admin_status(raw: &str) -> Result<CourseStatus, AppError> {
    match CourseStatus::parse(raw.trim())? {
        status @ (CourseStatus::Suspended | CourseStatus::Active) => Ok(status),
        _ => Err(AppError::invalid_input(
            "Administrators can only suspend or activate a course",
        )),
    }
}

/// Every course regardless of status
pub(super) async fn handle_list(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> PageResult<Response> {
    let courses = resources.database.list_all_courses().await?;
    Ok(Html(views::admin::courses_page(&admin, &courses, &flash)).into_response())
}

/// Suspend or reactivate a course
#[tracing::instrument(skip(resources, admin, form), fields(route = "admin_course_status"))]
pub(super) async fn handle_set_status(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(admin): RequireAdmin,
    Path(course_id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> PageResult<Response> {
    let status = match admin_status(&form.status) {
        Ok(status) => status,
        Err(e) => return redirect_on_error(PAGE, e),
    };
    match resources.database.set_course_status(course_id, status).await {
        Ok(()) => {
            info!(
                course_id,
                status = status.as_str(),
                admin_id = admin.account_id,
                "Course status changed"
            );
            Ok(redirect_notice(
                PAGE,
                &format!("Course marked {}", status.label().to_lowercase()),
            ))
        }
        Err(e) => redirect_on_error(PAGE, e),
    }
}

/// Delete a course and everything hanging off it
#[tracing::instrument(skip(resources, admin), fields(route = "admin_delete_course"))]
pub(super) async fn handle_delete(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(admin): RequireAdmin,
    Path(course_id): Path<i64>,
) -> PageResult<Response> {
    match resources.database.delete_course(course_id).await {
        Ok(()) => {
            info!(course_id, admin_id = admin.account_id, "Course deleted by admin");
            Ok(redirect_notice(PAGE, "Course deleted"))
        }
        Err(e) => redirect_on_error(PAGE, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_status() {
        assert_eq!(admin_status("suspended").unwrap(), CourseStatus::Suspended);
        assert_eq!(admin_status(" active ").unwrap(), CourseStatus::Active);
        assert!(admin_status("complete").is_err());
        assert!(admin_status("archived").is_err());
    }
}
