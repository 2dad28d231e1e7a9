// ABOUTME: Student profile pages: account details, password and email change, my courses, watchlist, reviews
// ABOUTME: Progress bars come from the stored enrollment progress
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::fmt::Write;

use super::course::review_list;
use super::helpers::{attr, esc, format_date, format_vnd};
use super::layout::{page, Flash};
use crate::auth::session::SessionUser;
use crate::models::{Account, AuthProvider, EnrolledCourse, Review, Role, WatchlistEntry};

fn profile_nav(user: &SessionUser, active: &str) -> String {
    let mut items = vec![("/profile", "Profile"), ("/profile/change-password", "Password"), ("/profile/change-email", "Email")];
    if user.role == Role::Student {
        items.extend([
            ("/profile/my-courses", "My courses"),
            ("/profile/watchlist", "Watchlist"),
            ("/profile/reviews", "My reviews"),
        ]);
    }
    let mut html = String::from(r#"<ul class="nav nav-pills mb-4">"#);
    for (href, label) in items {
        let _ = write!(
            html,
            r#"<li class="nav-item"><a class="nav-link{}" href="{href}">{label}</a></li>"#,
            if href == active { " active" } else { "" }
        );
    }
    html.push_str("</ul>");
    html
}

/// Account details form
#[must_use]
pub fn profile_page(user: &SessionUser, account: &Account, flash: &Flash) -> String {
    let provider = match account.auth_provider {
        AuthProvider::Email => "Email and password",
        AuthProvider::Google => "Google",
    };
    let avatar = account.avatar_url.as_deref().map_or_else(String::new, |url| {
        format!(
            r#"<img src="{}" alt="" class="rounded-circle mb-3" width="96" height="96">"#,
            attr(url)
        )
    });
    let body = format!(
        r#"{nav}{flash}
<div class="row"><div class="col-lg-6">
{avatar}
<dl class="row">
<dt class="col-sm-4">Email</dt><dd class="col-sm-8">{email}</dd>
<dt class="col-sm-4">Sign-in</dt><dd class="col-sm-8">{provider}</dd>
<dt class="col-sm-4">Member since</dt><dd class="col-sm-8">{since}</dd>
</dl>
<form method="post" action="/profile/update">
<div class="mb-3"><label class="form-label" for="full_name">Full name</label>
<input class="form-control" id="full_name" name="full_name" value="{name}" required maxlength="100"></div>
<div class="mb-3"><label class="form-label" for="avatar_url">Avatar URL</label>
<input class="form-control" id="avatar_url" name="avatar_url" type="url" value="{avatar_url}"></div>
<button class="btn btn-primary" type="submit">Save</button>
</form>
</div></div>"#,
        nav = profile_nav(user, "/profile"),
        flash = flash.render(),
        email = esc(&account.email),
        since = format_date(&account.created_at),
        name = attr(&account.full_name),
        avatar_url = attr(account.avatar_url.as_deref().unwrap_or_default()),
    );
    page("Profile", Some(user), &body)
}

/// Password change form
#[must_use]
pub fn change_password_page(user: &SessionUser, flash: &Flash) -> String {
    let body = format!(
        r#"{nav}{flash}
<div class="row"><div class="col-lg-6">
<form method="post" action="/profile/change-password">
<div class="mb-3"><label class="form-label" for="current_password">Current password</label>
<input class="form-control" id="current_password" name="current_password" type="password"></div>
<div class="mb-3"><label class="form-label" for="new_password">New password</label>
<input class="form-control" id="new_password" name="new_password" type="password" required minlength="8"></div>
<div class="mb-3"><label class="form-label" for="confirm_password">Confirm new password</label>
<input class="form-control" id="confirm_password" name="confirm_password" type="password" required></div>
<button class="btn btn-primary" type="submit">Change password</button>
</form>
</div></div>"#,
        nav = profile_nav(user, "/profile/change-password"),
        flash = flash.render(),
    );
    page("Change password", Some(user), &body)
}

/// Email change form
#[must_use]
pub fn change_email_page(user: &SessionUser, current_email: &str, flash: &Flash) -> String {
    let body = format!(
        r#"{nav}{flash}
<div class="row"><div class="col-lg-6">
<p>Current email: <strong>{current}</strong></p>
<form method="post" action="/profile/change-email">
<div class="mb-3"><label class="form-label" for="new_email">New email</label>
<input class="form-control" id="new_email" name="new_email" type="email" required></div>
<button class="btn btn-primary" type="submit">Send verification code</button>
</form>
</div></div>"#,
        nav = profile_nav(user, "/profile/change-email"),
        flash = flash.render(),
        current = esc(current_email),
    );
    page("Change email", Some(user), &body)
}

/// Code entry for an email change
#[must_use]
pub fn verify_email_page(user: &SessionUser, new_email: Option<&str>, flash: &Flash) -> String {
    let target = new_email.map_or_else(
        || "your new address".to_owned(),
        |email| format!("<strong>{}</strong>", esc(email)),
    );
    let body = format!(
        r#"{nav}{flash}
<div class="row"><div class="col-lg-6">
<p>Enter the 6-digit code we sent to {target}.</p>
<form method="post" action="/profile/verify-email">
<div class="mb-3"><input class="form-control form-control-lg text-center" name="code" inputmode="numeric" maxlength="6" required autofocus></div>
<button class="btn btn-primary" type="submit">Confirm new email</button>
</form>
</div></div>"#,
        nav = profile_nav(user, "/profile/change-email"),
        flash = flash.render(),
    );
    page("Confirm email", Some(user), &body)
}

fn progress_bar(progress: u8) -> String {
    format!(
        r#"<div class="progress" role="progressbar" aria-valuenow="{progress}" aria-valuemin="0" aria-valuemax="100"><div class="progress-bar" style="width:{progress}%">{progress}%</div></div>"#
    )
}

/// Enrolled courses with progress
#[must_use]
pub fn my_courses_page(user: &SessionUser, courses: &[EnrolledCourse]) -> String {
    let mut rows = String::new();
    for enrolled in courses {
        let course = &enrolled.course;
        let _ = write!(
            rows,
            r#"<div class="card mb-3"><div class="card-body d-flex align-items-center gap-4">
<div class="flex-grow-1">
<h2 class="h6 fw-bold mb-1"><a href="/courses/{id}">{title}</a>{saved}</h2>
<div class="small text-muted mb-2">{instructor} · Enrolled {date}</div>
{bar}
</div>
<a class="btn btn-primary" href="/learn/{id}">{action}</a>
</div></div>"#,
            id = course.course_id,
            title = esc(&course.title),
            saved = if enrolled.in_watchlist {
                r#" <i class="bi bi-heart-fill text-danger" title="In watchlist"></i>"#
            } else {
                ""
            },
            instructor = esc(course.instructor_name.as_deref().unwrap_or_default()),
            date = format_date(&enrolled.enrolled_at),
            bar = progress_bar(enrolled.progress),
            action = if enrolled.progress >= 100 { "Review" } else { "Continue" },
        );
    }
    if rows.is_empty() {
        rows = r#"<p class="text-muted">You have not enrolled in any course yet. <a href="/courses">Browse courses</a></p>"#.to_owned();
    }
    let body = format!("{}{rows}", profile_nav(user, "/profile/my-courses"));
    page("My courses", Some(user), &body)
}

/// Saved courses with a remove button
#[must_use]
pub fn watchlist_page(user: &SessionUser, entries: &[WatchlistEntry], flash: &Flash) -> String {
    let mut rows = String::new();
    for entry in entries {
        let course = &entry.course;
        let _ = write!(
            rows,
            r#"<div class="card mb-3"><div class="card-body d-flex align-items-center gap-4">
<div class="flex-grow-1">
<h2 class="h6 fw-bold mb-1"><a href="/courses/{id}">{title}</a></h2>
<div class="small text-muted">{category} · {price} · Saved {date}</div>
</div>
<form method="post" action="/profile/watchlist/{id}/remove"><button class="btn btn-outline-danger btn-sm" type="submit">Remove</button></form>
</div></div>"#,
            id = course.course_id,
            title = esc(&course.title),
            category = esc(course.category_name.as_deref().unwrap_or_default()),
            price = format_vnd(course.current_price),
            date = format_date(&entry.added_at),
        );
    }
    if rows.is_empty() {
        rows = r#"<p class="text-muted">Your watchlist is empty.</p>"#.to_owned();
    }
    let body = format!(
        "{}{}{rows}",
        profile_nav(user, "/profile/watchlist"),
        flash.render()
    );
    page("Watchlist", Some(user), &body)
}

/// Reviews written by the student
#[must_use]
pub fn my_reviews_page(user: &SessionUser, reviews: &[Review]) -> String {
    let body = format!(
        "{}{}",
        profile_nav(user, "/profile/reviews"),
        review_list(reviews, true)
    );
    page("My reviews", Some(user), &body)
}
