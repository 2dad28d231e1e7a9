// ABOUTME: Page shell shared by all HTML responses: head, navigation, footer, flash messages
// ABOUTME: Also renders the generic error page used by PageError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::fmt::Write;

use axum::http::StatusCode;
use serde::Deserialize;

use super::helpers::{attr, esc};
use crate::auth::session::SessionUser;
use crate::constants::service;
use crate::models::Role;

/// Success or failure banner shown above page content, read from `?notice=` / `?error=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Flash {
    /// Green banner
    pub notice: Option<String>,
    /// Red banner
    pub error: Option<String>,
}

impl Flash {
    /// Banner with an error message
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            notice: None,
            error: Some(message.into()),
        }
    }

    /// Banner with a success message
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            notice: Some(message.into()),
            error: None,
        }
    }

    /// HTML for the banners
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::new();
        if let Some(notice) = self.notice.as_deref().filter(|m| !m.is_empty()) {
            let _ = write!(
                html,
                r#"<div class="alert alert-success" role="status">{}</div>"#,
                esc(notice)
            );
        }
        if let Some(error) = self.error.as_deref().filter(|m| !m.is_empty()) {
            let _ = write!(
                html,
                r#"<div class="alert alert-danger" role="alert">{}</div>"#,
                esc(error)
            );
        }
        html
    }
}

fn user_menu(user: Option<&SessionUser>) -> String {
    let Some(user) = user else {
        return r#"<a class="btn btn-outline-primary btn-sm" href="/auth/login">Log in</a>
<a class="btn btn-primary btn-sm" href="/auth/register">Sign up</a>"#
            .to_owned();
    };

    let links = match user.role {
        Role::Student => {
            r#"<a class="dropdown-item" href="/profile/my-courses">My courses</a>
<a class="dropdown-item" href="/profile/watchlist">Watchlist</a>
<a class="dropdown-item" href="/profile/reviews">My reviews</a>"#
        }
        Role::Instructor => {
            r#"<a class="dropdown-item" href="/instructor">Overview</a>
<a class="dropdown-item" href="/instructor/dashboard">My courses</a>
<a class="dropdown-item" href="/instructor/courses/new">New course</a>"#
        }
        Role::Admin => {
            r#"<a class="dropdown-item" href="/admin">Dashboard</a>
<a class="dropdown-item" href="/admin/categories">Categories</a>
<a class="dropdown-item" href="/admin/courses">Courses</a>
<a class="dropdown-item" href="/admin/users">Users</a>"#
        }
    };

    format!(
        r#"<div class="dropdown">
<button class="btn btn-light btn-sm dropdown-toggle" data-bs-toggle="dropdown">{name}</button>
<div class="dropdown-menu dropdown-menu-end">
{links}
<a class="dropdown-item" href="/profile">Profile</a>
<form method="post" action="/auth/logout"><button class="dropdown-item" type="submit">Log out</button></form>
</div>
</div>"#,
        name = esc(&user.name),
    )
}

/// Full HTML document around `body`
#[must_use]
pub fn page(title: &str, user: Option<&SessionUser>, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.3/font/bootstrap-icons.min.css">
<style>.stars{{color:#f4c150}}.course-card{{cursor:pointer}}.hover-shadow:hover{{box-shadow:0 .5rem 1rem rgba(0,0,0,.15)}}</style>
</head>
<body>
<nav class="navbar navbar-expand bg-white border-bottom mb-4">
<div class="container">
<a class="navbar-brand fw-bold text-primary" href="/">{site}</a>
<a class="nav-link me-3" href="/courses">Courses</a>
<form class="d-flex flex-grow-1 me-3" action="/search" method="get">
<input class="form-control" type="search" name="q" placeholder="Search courses" aria-label="Search">
</form>
{menu}
</div>
</nav>
<main class="container mb-5">
{body}
</main>
<div class="modal fade" id="courseModal" tabindex="-1"><div class="modal-dialog modal-lg modal-dialog-centered"><div class="modal-content"><div class="modal-body" id="modalContent"></div></div></div></div>
<footer class="border-top py-4 text-center text-muted small">&copy; {site}</footer>
<script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js"></script>
<script src="/static/app.js"></script>
</body>
</html>"#,
        title = esc(title),
        site = esc(service::SITE_NAME),
        menu = user_menu(user),
    )
}

/// Standalone error page
#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = match status {
        StatusCode::NOT_FOUND => "Page not found",
        StatusCode::BAD_REQUEST => "Invalid request",
        StatusCode::CONFLICT => "Already done",
        _ => "Something went wrong",
    };
    let body = format!(
        r#"<div class="text-center py-5">
<h1 class="display-4">{code}</h1>
<h2 class="h4 mb-3">{heading}</h2>
<p class="text-muted">{message}</p>
<a class="btn btn-primary" href="/">Back to home</a>
</div>"#,
        code = status.as_u16(),
        message = esc(message),
    );
    page(heading, None, &body)
}

/// Pagination links; `href` maps a page number to its URL
#[must_use]
pub fn pagination(current: i64, total_pages: i64, href: impl Fn(i64) -> String) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    let mut html = String::from(r#"<nav><ul class="pagination justify-content-center">"#);
    for number in 1..=total_pages {
        let _ = write!(
            html,
            r#"<li class="page-item{}"><a class="page-link" href="{}">{number}</a></li>"#,
            if number == current { " active" } else { "" },
            attr(&href(number)),
        );
    }
    html.push_str("</ul></nav>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_escapes_title_and_shows_login() {
        let html = page("<script>", None, "<p>body</p>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("/auth/login"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_menu_follows_role() {
        let admin = SessionUser {
            account_id: 1,
            role: Role::Admin,
            name: "Root".to_owned(),
        };
        let html = page("Admin", Some(&admin), "");
        assert!(html.contains("/admin/categories"));
        assert!(!html.contains("/profile/watchlist"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::NOT_FOUND, "Course not found");
        assert!(html.contains("404"));
        assert!(html.contains("Course not found"));
    }

    #[test]
    fn test_pagination_marks_current() {
        let html = pagination(2, 3, |n| format!("/courses?page={n}"));
        assert!(html.contains(r#"class="page-item active"><a class="page-link" href="/courses?page=2""#));
        assert!(pagination(1, 1, |n| n.to_string()).is_empty());
    }
}
