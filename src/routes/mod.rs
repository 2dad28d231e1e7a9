// ABOUTME: Route module organization for the Online Academy HTTP endpoints
// ABOUTME: Each area exposes an XRoutes struct whose routes() are merged into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Route module for Online Academy
//!
//! Each area module contains route definitions and thin handlers that load
//! data through [`crate::database::Database`] and render a view. HTML handlers
//! return [`crate::errors::PageResult`]; JSON handlers return
//! `Result<Response, AppError>`.
//!
//! After a form post, handlers redirect (303) and pass banners in the query
//! string as `?notice=` or `?error=`, which the target page reads into a
//! [`crate::views::Flash`].

/// Admin area
pub mod admin;
/// Registration, verification, login and logout
pub mod auth;
/// Category pages and the category JSON feed
pub mod category;
/// Course listing, detail page, detail JSON and watchlist toggles
pub mod courses;
/// Enrollment JSON endpoints
pub mod enrollment;
/// Health check
pub mod health;
/// Home page and static assets
pub mod home;
/// Instructor area
pub mod instructor;
/// Learning page, lecture completion and reviews
pub mod learn;
/// Google sign-in
#[cfg(feature = "oauth")]
pub mod oauth;
/// Profile pages
pub mod profile;
/// Search page and JSON search
pub mod search;

use std::sync::Arc;

use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Router;
use tracing::debug;

use crate::errors::{AppError, PageError};
use crate::resources::ServerResources;

/// Build the full application router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    let router = Router::new()
        .merge(health::HealthRoutes::routes(resources.clone()))
        .merge(home::HomeRoutes::routes(resources.clone()))
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(courses::CourseRoutes::routes(resources.clone()))
        .merge(category::CategoryRoutes::routes(resources.clone()))
        .merge(search::SearchRoutes::routes(resources.clone()))
        .merge(enrollment::EnrollmentRoutes::routes(resources.clone()))
        .merge(learn::LearnRoutes::routes(resources.clone()))
        .merge(profile::ProfileRoutes::routes(resources.clone()))
        .merge(instructor::InstructorRoutes::routes(resources.clone()))
        .merge(admin::AdminRoutes::routes(resources.clone()));

    #[cfg(feature = "oauth")]
    let router = router.merge(oauth::OAuthRoutes::routes(resources.clone()));

    router.fallback(handle_not_found)
}

async fn handle_not_found(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route");
    PageError::from(AppError::not_found("Page")).into_response()
}

fn redirect_with(path: &str, key: &str, message: &str) -> Response {
    let separator = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{separator}{key}={}",
        urlencoding::encode(message)
    ))
    .into_response()
}

/// Redirect with a success banner
pub(crate) fn redirect_notice(path: &str, message: &str) -> Response {
    redirect_with(path, "notice", message)
}

/// Redirect with an error banner
pub(crate) fn redirect_error(path: &str, message: &str) -> Response {
    redirect_with(path, "error", message)
}

/// Redirect back with the error's user-facing message, or propagate internal failures
pub(crate) fn redirect_on_error(path: &str, error: AppError) -> Result<Response, PageError> {
    if error.code.is_user_facing() {
        Ok(redirect_error(path, &error.message))
    } else {
        Err(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_redirect_with_encodes_message() {
        let response = redirect_notice("/admin/categories", "Category \"Web\" created");
        assert_eq!(
            response.headers()[LOCATION],
            "/admin/categories?notice=Category%20%22Web%22%20created"
        );
        let response = redirect_error("/search?q=a", "bad");
        assert_eq!(response.headers()[LOCATION], "/search?q=a&error=bad");
    }
}
