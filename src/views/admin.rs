// ABOUTME: Admin area pages: dashboard counters, category management, course moderation, users
// ABOUTME: Every mutation is a small form posting back to an /admin route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::fmt::Write;

use super::helpers::{attr, esc, format_date, format_rating, format_vnd};
use super::layout::{page, Flash};
use crate::auth::session::SessionUser;
use crate::models::{AdminCounts, Category, CategoryStats, CourseCard, CourseStatus, UserSummary};

fn admin_nav(active: &str) -> String {
    let mut html = String::from(r#"<ul class="nav nav-tabs mb-4">"#);
    for (href, label) in [
        ("/admin", "Dashboard"),
        ("/admin/categories", "Categories"),
        ("/admin/courses", "Courses"),
        ("/admin/users", "Users"),
    ] {
        let _ = write!(
            html,
            r#"<li class="nav-item"><a class="nav-link{}" href="{href}">{label}</a></li>"#,
            if href == active { " active" } else { "" }
        );
    }
    html.push_str("</ul>");
    html
}

/// Totals
#[must_use]
pub fn dashboard_page(user: &SessionUser, counts: &AdminCounts) -> String {
    let mut cards = String::new();
    for (label, value, href) in [
        ("Categories", counts.categories, "/admin/categories"),
        ("Courses", counts.courses, "/admin/courses"),
        ("Instructors", counts.instructors, "/admin/users"),
        ("Students", counts.students, "/admin/users"),
    ] {
        let _ = write!(
            cards,
            r#"<div class="col-6 col-lg-3"><a class="card text-center p-4 text-decoration-none" href="{href}"><div class="display-6 fw-bold">{value}</div><div class="text-muted">{label}</div></a></div>"#
        );
    }
    let body = format!(
        r#"{}<h1 class="h3 fw-bold mb-4">Dashboard</h1><div class="row g-4">{cards}</div>"#,
        admin_nav("/admin")
    );
    page("Admin", Some(user), &body)
}

/// Category list with create, rename and delete
#[must_use]
pub fn categories_page(
    user: &SessionUser,
    stats: &[CategoryStats],
    parents: &[Category],
    flash: &Flash,
) -> String {
    let mut rows = String::new();
    for row in stats {
        let _ = write!(
            rows,
            r#"<tr>
<td><form class="d-flex gap-2" method="post" action="/admin/categories/{id}/update">
<input class="form-control form-control-sm" name="name" value="{name}" required>
<button class="btn btn-sm btn-outline-primary" type="submit">Rename</button></form></td>
<td>{parent}</td><td>{courses}</td><td>{students}</td><td>{rating}</td><td>{weekly}</td>
<td class="text-end"><form method="post" action="/admin/categories/{id}/delete"><button class="btn btn-sm btn-outline-danger" type="submit">Delete</button></form></td>
</tr>"#,
            id = row.category_id,
            name = attr(&row.category_name),
            parent = esc(&row.parent_name),
            courses = row.course_count,
            students = row.total_students,
            rating = format_rating(row.avg_star),
            weekly = row.weekly_enrollments,
        );
    }

    let mut parent_options = String::from(r#"<option value="">Top level</option>"#);
    for parent in parents.iter().filter(|c| c.is_top_level()) {
        let _ = write!(
            parent_options,
            r#"<option value="{}">{}</option>"#,
            parent.category_id,
            esc(&parent.name)
        );
    }

    let body = format!(
        r#"{nav}{flash}
<form class="row g-2 mb-4" method="post" action="/admin/categories">
<div class="col-md-5"><input class="form-control" name="name" placeholder="Category name" required></div>
<div class="col-md-4"><select class="form-select" name="parent_id">{parent_options}</select></div>
<div class="col-md-3"><button class="btn btn-primary w-100" type="submit">Add category</button></div>
</form>
<table class="table align-middle">
<thead><tr><th>Name</th><th>Parent</th><th>Courses</th><th>Students</th><th>Rating</th><th>Enrollments (7 days)</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        nav = admin_nav("/admin/categories"),
        flash = flash.render(),
    );
    page("Categories", Some(user), &body)
}

/// All courses with suspend/activate and delete
#[must_use]
pub fn courses_page(user: &SessionUser, courses: &[CourseCard], flash: &Flash) -> String {
    let mut rows = String::new();
    for course in courses {
        let (next, label) = if course.status == CourseStatus::Suspended {
            (CourseStatus::Active, "Activate")
        } else {
            (CourseStatus::Suspended, "Suspend")
        };
        let _ = write!(
            rows,
            r#"<tr>
<td><a href="/courses/{id}">{title}</a></td>
<td>{instructor}</td><td>{category}</td><td>{price}</td><td>{students}</td>
<td><span class="badge bg-{badge}">{status}</span></td>
<td class="text-end">
<form class="d-inline" method="post" action="/admin/courses/{id}/status"><input type="hidden" name="status" value="{next}"><button class="btn btn-sm btn-outline-warning" type="submit">{label}</button></form>
<form class="d-inline" method="post" action="/admin/courses/{id}/delete" onsubmit="return confirm('Delete this course permanently?')"><button class="btn btn-sm btn-outline-danger" type="submit">Delete</button></form>
</td></tr>"#,
            id = course.course_id,
            title = esc(&course.title),
            instructor = esc(course.instructor_name.as_deref().unwrap_or_default()),
            category = esc(course.category_name.as_deref().unwrap_or_default()),
            price = format_vnd(course.current_price),
            students = course.student_count,
            badge = if course.status == CourseStatus::Suspended { "danger" } else { "secondary" },
            status = course.status.label(),
            next = next.as_str(),
        );
    }
    let body = format!(
        r#"{nav}{flash}
<table class="table align-middle">
<thead><tr><th>Course</th><th>Instructor</th><th>Category</th><th>Price</th><th>Students</th><th>Status</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        nav = admin_nav("/admin/courses"),
        flash = flash.render(),
    );
    page("Courses", Some(user), &body)
}

fn user_table(title: &str, users: &[UserSummary], count_label: &str) -> String {
    let mut rows = String::new();
    for summary in users {
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            esc(&summary.full_name),
            esc(&summary.email),
            if summary.is_verified { "Yes" } else { "No" },
            summary.course_count,
            format_date(&summary.created_at),
        );
    }
    format!(
        r#"<h2 class="h5 fw-bold mt-4 mb-3">{title} ({count})</h2>
<table class="table"><thead><tr><th>Name</th><th>Email</th><th>Verified</th><th>{count_label}</th><th>Joined</th></tr></thead><tbody>{rows}</tbody></table>"#,
        title = esc(title),
        count = users.len(),
    )
}

/// Instructors and students, plus the instructor account form
#[must_use]
pub fn users_page(
    user: &SessionUser,
    instructors: &[UserSummary],
    students: &[UserSummary],
    flash: &Flash,
) -> String {
    let body = format!(
        r#"{nav}{flash}
<h2 class="h5 fw-bold mb-3">Create instructor account</h2>
<form class="row g-2 mb-4" method="post" action="/admin/instructors">
<div class="col-md-3"><input class="form-control" name="full_name" placeholder="Full name" required></div>
<div class="col-md-3"><input class="form-control" name="email" type="email" placeholder="Email" required></div>
<div class="col-md-3"><input class="form-control" name="password" type="password" placeholder="Initial password" required minlength="8"></div>
<div class="col-md-3"><button class="btn btn-primary w-100" type="submit">Create instructor</button></div>
<div class="col-12"><textarea class="form-control" name="bio" rows="2" placeholder="Bio (optional)"></textarea></div>
</form>
{instructors}
{students}"#,
        nav = admin_nav("/admin/users"),
        flash = flash.render(),
        instructors = user_table("Instructors", instructors, "Courses taught"),
        students = user_table("Students", students, "Enrollments"),
    );
    page("Users", Some(user), &body)
}
