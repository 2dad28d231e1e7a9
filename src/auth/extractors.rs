// ABOUTME: Axum extractors that read the session cookie and enforce roles
// ABOUTME: Page guards redirect to login or home; the API guard answers 401/403 JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Role-gated request extractors
//!
//! | Extractor | Missing session | Wrong role |
//! |---|---|---|
//! | [`MaybeUser`] | `None` | n/a |
//! | [`RequireUser`] | login redirect | n/a |
//! | [`RequireStudent`] | login redirect | redirect `/` |
//! | [`RequireInstructor`] | login redirect | redirect `/` |
//! | [`RequireAdmin`] | login redirect | student `/`, instructor `/instructor` |
//! | [`ApiStudent`] | 401 JSON | 403 JSON |
//!
//! Login redirects carry `return_to` for GET requests only, so a student who
//! follows a link to a protected page lands back on it after signing in.

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use super::session::SessionUser;
use crate::constants::session;
use crate::errors::{AppError, AppResult, PageError};
use crate::models::{Instructor, Role};
use crate::resources::ServerResources;
use crate::security::cookies::get_cookie_value;

/// Resolve the session cookie into a user
///
/// # Errors
///
/// Returns `AuthRequired` without a cookie and `AuthInvalid` for a bad token
pub fn session_user(parts: &Parts, resources: &ServerResources) -> AppResult<SessionUser> {
    let token = get_cookie_value(&parts.headers, session::COOKIE_NAME)
        .ok_or_else(AppError::auth_required)?;
    resources.sessions.verify(&token)
}

fn return_path(parts: &Parts) -> Option<String> {
    if parts.method != Method::GET {
        return None;
    }
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
}

fn login_redirect(parts: &Parts, error: AppError) -> Response {
    let page_error = PageError::from(error);
    match return_path(parts) {
        Some(path) => page_error.with_return_to(path),
        None => page_error,
    }
    .into_response()
}

fn require_session(parts: &Parts, resources: &ServerResources) -> Result<SessionUser, Response> {
    session_user(parts, resources).map_err(|e| login_redirect(parts, e))
}

/// The signed-in user, if any
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts, state).ok()))
    }
}

/// Any signed-in user
#[derive(Debug, Clone)]
pub struct RequireUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        require_session(parts, state).map(Self)
    }
}

/// A signed-in student with a student profile
#[derive(Debug, Clone)]
pub struct RequireStudent {
    /// Session user
    pub user: SessionUser,
    /// Student row id
    pub student_id: i64,
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for RequireStudent {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let user = require_session(parts, state)?;
        if user.role != Role::Student {
            debug!(role = user.role.as_str(), "Student page refused");
            return Err(Redirect::to("/").into_response());
        }
        let student_id = state
            .database
            .require_student_id(user.account_id)
            .await
            .map_err(|e| PageError::from(e).into_response())?;
        Ok(Self { user, student_id })
    }
}

/// A signed-in instructor with an instructor profile
#[derive(Debug, Clone)]
pub struct RequireInstructor {
    /// Session user
    pub user: SessionUser,
    /// Instructor profile
    pub instructor: Instructor,
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for RequireInstructor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let user = require_session(parts, state)?;
        if user.role != Role::Instructor {
            debug!(role = user.role.as_str(), "Instructor page refused");
            return Err(Redirect::to("/").into_response());
        }
        let instructor = state
            .database
            .get_instructor_by_account(user.account_id)
            .await
            .map_err(|e| PageError::from(e).into_response())?
            .ok_or_else(|| Redirect::to("/").into_response())?;
        Ok(Self { user, instructor })
    }
}

/// A signed-in administrator
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let user = require_session(parts, state)?;
        match user.role {
            Role::Admin => Ok(Self(user)),
            Role::Instructor => Err(Redirect::to(Role::Instructor.home_path()).into_response()),
            Role::Student => Err(Redirect::to("/").into_response()),
        }
    }
}

/// A student calling a JSON endpoint
#[derive(Debug, Clone)]
pub struct ApiStudent {
    /// Session user
    pub user: SessionUser,
    /// Student row id
    pub student_id: i64,
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for ApiStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let user = session_user(parts, state)?;
        if user.role != Role::Student {
            return Err(AppError::permission_denied(
                "Only students can perform this action",
            ));
        }
        let student_id = state.database.require_student_id(user.account_id).await?;
        Ok(Self { user, student_id })
    }
}
