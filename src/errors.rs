// ABOUTME: Unified error taxonomy for the academy server with HTTP status mapping
// ABOUTME: Provides AppError, ErrorCode, AppResult and the HTML-facing PageError wrapper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Error handling
//!
//! Every fallible operation in the crate returns [`AppResult`]. API handlers
//! return `AppError` directly and get a JSON body; HTML handlers wrap it in
//! [`PageError`] so that auth failures become redirects instead of JSON.

use std::fmt;

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Machine-readable error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No session cookie, or the session expired
    AuthRequired,
    /// Credentials or token did not verify
    AuthInvalid,
    /// Authenticated but not allowed
    PermissionDenied,
    /// Entity does not exist
    ResourceNotFound,
    /// Unique constraint or duplicate action
    ResourceAlreadyExists,
    /// Request failed validation
    InvalidInput,
    /// Storage layer failure
    DatabaseError,
    /// Mail provider or OAuth provider failure
    ExternalServiceError,
    /// Missing or malformed configuration
    ConfigError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::AuthRequired | Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::ResourceAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::ExternalServiceError => StatusCode::BAD_GATEWAY,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable string form used in JSON bodies and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthRequired => "auth_required",
            Self::AuthInvalid => "auth_invalid",
            Self::PermissionDenied => "permission_denied",
            Self::ResourceNotFound => "resource_not_found",
            Self::ResourceAlreadyExists => "resource_already_exists",
            Self::InvalidInput => "invalid_input",
            Self::DatabaseError => "database_error",
            Self::ExternalServiceError => "external_service_error",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
        }
    }

    /// Whether the message is safe to show to end users
    #[must_use]
    pub const fn is_user_facing(self) -> bool {
        !matches!(
            self,
            Self::DatabaseError | Self::ConfigError | Self::InternalError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error carrying a code and a message
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error category
    pub code: ErrorCode,
    /// Human-readable detail
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Storage failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing entity, formatted as "`{resource}` not found"
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Duplicate entity or action
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Session missing
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Credentials rejected
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Role or ownership check failed
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Upstream provider failure
    pub fn external_service(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{service}: {}", message.into()),
        )
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Message that can be shown to a user without leaking internals
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.code.is_user_facing() {
            self.message.clone()
        } else {
            "Something went wrong. Please try again later.".to_owned()
        }
    }

    /// Map a sqlx error, turning unique-constraint violations into conflicts
    pub fn from_sqlx(context: &str, err: &sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = err {
            if db_err.is_unique_violation() {
                return Self::already_exists(format!("{context}: duplicate entry"));
            }
        }
        Self::database(format!("{context}: {err}"))
    }

    fn log(&self) {
        if self.code.is_user_facing() {
            warn!(code = %self.code, "{}", self.message);
        } else {
            error!(code = %self.code, "{}", self.message);
        }
    }
}

/// JSON error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorBody,
}

/// Error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code
    pub code: ErrorCode,
    /// User-facing message
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.public_message(),
            },
        };
        (self.http_status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx("Database operation failed", &err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::external_service("http", err.to_string())
    }
}

/// Error wrapper for HTML routes
///
/// `AuthRequired`/`AuthInvalid` redirect to the login page (keeping the
/// requested path in `return_to` when known), `PermissionDenied` redirects
/// home, `ResourceNotFound` renders the 404 page.
#[derive(Debug)]
pub struct PageError {
    /// Underlying error
    pub error: AppError,
    /// Path to come back to after logging in
    pub return_to: Option<String>,
}

impl PageError {
    /// Attach a return path for login redirects
    #[must_use]
    pub fn with_return_to(mut self, path: impl Into<String>) -> Self {
        self.return_to = Some(path.into());
        self
    }
}

impl From<AppError> for PageError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            return_to: None,
        }
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from(err).into()
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.error.log();
        match self.error.code {
            ErrorCode::AuthRequired | ErrorCode::AuthInvalid => {
                let target = self.return_to.map_or_else(
                    || "/auth/login".to_owned(),
                    |path| format!("/auth/login?return_to={}", urlencoding::encode(&path)),
                );
                Redirect::to(&target).into_response()
            }
            ErrorCode::PermissionDenied => Redirect::to("/").into_response(),
            code => {
                let status = code.http_status();
                let page = crate::views::layout::error_page(status, &self.error.public_message());
                (
                    status,
                    [(header::CACHE_CONTROL, "no-store")],
                    Html(page),
                )
                    .into_response()
            }
        }
    }
}

/// Result alias for HTML handlers
pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::auth_required().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::permission_denied("no").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("Course").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::already_exists("dup").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::invalid_input("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::external_service("mail", "down").http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::database("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(AppError::not_found("Course").message, "Course not found");
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::database("Failed to query courses: disk I/O error");
        assert!(!err.public_message().contains("disk"));
        let err = AppError::invalid_input("Rating must be between 1 and 5");
        assert_eq!(err.public_message(), "Rating must be between 1 and 5");
    }

    #[test]
    fn test_page_error_redirects_to_login() {
        let response =
            PageError::from(AppError::auth_required()).with_return_to("/learn/3").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert_eq!(location, "/auth/login?return_to=%2Flearn%2F3");
    }

    #[test]
    fn test_page_error_forbidden_redirects_home() {
        let response = PageError::from(AppError::permission_denied("admins only")).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }
}
