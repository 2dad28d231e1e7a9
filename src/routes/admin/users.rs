// ABOUTME: Admin user handlers: instructor and student listings, instructor account creation
// ABOUTME: Instructor accounts are created pre-verified with their profile row in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::auth::extractors::RequireAdmin;
use crate::auth::provisioning::{provision_account, ProvisionRequest};
use crate::errors::PageResult;
use crate::models::Role;
use crate::resources::ServerResources;
use crate::routes::{redirect_notice, redirect_on_error};
use crate::views::{self, Flash};

const PAGE: &str = "/admin/users";

/// New instructor form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct InstructorForm {
    full_name: String,
    email: String,
    password: String,
    bio: String,
}

/// Instructors and students
pub(super) async fn handle_list(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> PageResult<Response> {
    let instructors = resources.database.list_users(Role::Instructor).await?;
    let students = resources.database.list_users(Role::Student).await?;
    Ok(Html(views::admin::users_page(&admin, &instructors, &students, &flash)).into_response())
}

/// Create an instructor account
#[tracing::instrument(skip(resources, _admin, form), fields(route = "admin_create_instructor"))]
pub(super) async fn handle_create_instructor(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<InstructorForm>,
) -> PageResult<Response> {
    let request = ProvisionRequest {
        full_name: form.full_name,
        email: form.email,
        password: form.password,
        bio: Some(form.bio),
    };
    match provision_account(&resources.database, Role::Instructor, &request).await {
        Ok(account) => Ok(redirect_notice(
            PAGE,
            &format!("Instructor account created for {}", account.email),
        )),
        Err(e) => redirect_on_error(PAGE, e),
    }
}
