// ABOUTME: Instructor area pages: overview stats, course dashboard, course editor, profile
// ABOUTME: The course editor also manages sections and lectures of an existing course
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::fmt::Write;

use serde::Deserialize;

use super::catalog::course_meta;
use super::helpers::{attr, esc, format_count, format_duration, format_rating, format_vnd};
use super::layout::{page, Flash};
use crate::auth::session::SessionUser;
use crate::models::{Category, Course, CourseCard, CourseStatus, Instructor, InstructorStats, Section};

/// Raw course form fields, kept as submitted so the form can be re-rendered
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseForm {
    /// Title
    #[serde(default)]
    pub title: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Long description
    #[serde(default)]
    pub detail_html: String,
    /// Cover image URL
    #[serde(default)]
    pub image_url: String,
    /// Selling price
    #[serde(default)]
    pub current_price: String,
    /// List price
    #[serde(default)]
    pub original_price: String,
    /// Category id, empty for none
    #[serde(default)]
    pub category_id: String,
    /// `incomplete` or `complete` when editing
    #[serde(default)]
    pub status: String,
}

impl CourseForm {
    /// Prefill from a stored course
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            detail_html: course.detail_html.clone(),
            image_url: course.image_url.clone().unwrap_or_default(),
            current_price: course.current_price.to_string(),
            original_price: course.original_price.to_string(),
            category_id: course.category_id.map(|id| id.to_string()).unwrap_or_default(),
            status: course.status.as_str().to_owned(),
        }
    }
}

fn instructor_nav(active: &str) -> String {
    let mut html = String::from(r#"<ul class="nav nav-tabs mb-4">"#);
    for (href, label) in [
        ("/instructor", "Overview"),
        ("/instructor/dashboard", "My courses"),
        ("/instructor/courses/new", "New course"),
        ("/instructor/profile", "Profile"),
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

/// Overview with headline numbers
#[must_use]
pub fn overview_page(user: &SessionUser, instructor: &Instructor, stats: &InstructorStats) -> String {
    let tiles = [
        ("Courses", stats.total_courses),
        ("Completed courses", stats.completed_courses),
        ("Lectures", stats.total_lectures),
        ("Students", stats.total_students),
    ];
    let mut cards = String::new();
    for (label, value) in tiles {
        let _ = write!(
            cards,
            r#"<div class="col-6 col-lg-3"><div class="card text-center p-4"><div class="display-6 fw-bold">{}</div><div class="text-muted">{label}</div></div></div>"#,
            format_count(value)
        );
    }
    let body = format!(
        r#"{nav}<h1 class="h3 fw-bold mb-4">Welcome back, {name}</h1><div class="row g-4">{cards}</div>"#,
        nav = instructor_nav("/instructor"),
        name = esc(&instructor.name),
    );
    page("Instructor", Some(user), &body)
}

/// Own courses with edit and delete actions
#[must_use]
pub fn dashboard_page(user: &SessionUser, courses: &[CourseCard], flash: &Flash) -> String {
    let mut rows = String::new();
    for course in courses {
        let _ = write!(
            rows,
            r#"<tr>
<td><a href="/courses/{id}">{title}</a><div class="small text-muted">{meta}</div></td>
<td><span class="badge bg-secondary">{status}</span></td>
<td>{price}</td><td>{students}</td><td>{rating}</td>
<td class="text-end">
<a class="btn btn-sm btn-outline-primary" href="/instructor/courses/{id}/edit">Edit</a>
<form class="d-inline" method="post" action="/instructor/courses/{id}/delete" onsubmit="return confirm('Delete this course and all its content?')"><button class="btn btn-sm btn-outline-danger" type="submit">Delete</button></form>
</td></tr>"#,
            id = course.course_id,
            title = esc(&course.title),
            meta = course_meta(course),
            status = course.status.label(),
            price = format_vnd(course.current_price),
            students = course.student_count,
            rating = format_rating(course.star),
        );
    }
    if rows.is_empty() {
        rows = r#"<tr><td colspan="6" class="text-center text-muted py-4">No courses yet. <a href="/instructor/courses/new">Create your first course</a></td></tr>"#.to_owned();
    }
    let body = format!(
        r#"{nav}{flash}
<table class="table align-middle">
<thead><tr><th>Course</th><th>Status</th><th>Price</th><th>Students</th><th>Rating</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        nav = instructor_nav("/instructor/dashboard"),
        flash = flash.render(),
    );
    page("My courses", Some(user), &body)
}

fn category_options(categories: &[Category], selected: &str) -> String {
    let mut html = String::from(r#"<option value="">No category</option>"#);
    for category in categories {
        let value = category.category_id.to_string();
        let _ = write!(
            html,
            r#"<option value="{value}"{}>{}{}</option>"#,
            if value == selected { " selected" } else { "" },
            if category.is_top_level() { "" } else { "↳ " },
            esc(&category.name)
        );
    }
    html
}

fn curriculum_editor(course_id: i64, sections: &[Section]) -> String {
    let mut html = String::from(r#"<h2 class="h5 fw-bold mt-5 mb-3">Curriculum</h2>"#);
    for section in sections {
        let _ = write!(
            html,
            r#"<div class="card mb-3"><div class="card-header fw-semibold">{title}</div><ul class="list-group list-group-flush">"#,
            title = esc(&section.title)
        );
        for lecture in &section.lectures {
            let _ = write!(
                html,
                r#"<li class="list-group-item d-flex justify-content-between"><span>{}{}</span><span class="small text-muted">{}</span></li>"#,
                esc(&lecture.title),
                if lecture.is_preview { r#" <span class="badge bg-info text-dark">Preview</span>"# } else { "" },
                format_duration(lecture.duration_seconds)
            );
        }
        let _ = write!(
            html,
            r#"</ul><div class="card-body"><form class="row g-2" method="post" action="/instructor/sections/{id}/lectures">
<input type="hidden" name="course_id" value="{course_id}">
<div class="col-md-4"><input class="form-control form-control-sm" name="title" placeholder="Lecture title" required></div>
<div class="col-md-4"><input class="form-control form-control-sm" name="video_url" placeholder="Video URL"></div>
<div class="col-md-2"><input class="form-control form-control-sm" name="duration_minutes" type="number" min="0" step="0.5" placeholder="Minutes"></div>
<div class="col-md-1 form-check pt-1"><input class="form-check-input" type="checkbox" name="is_preview" value="true" id="preview-{id}"><label class="form-check-label small" for="preview-{id}">Preview</label></div>
<div class="col-md-1"><button class="btn btn-sm btn-primary w-100" type="submit">Add</button></div>
</form></div></div>"#,
            id = section.section_id
        );
    }
    let _ = write!(
        html,
        r#"<form class="d-flex gap-2" method="post" action="/instructor/courses/{course_id}/sections">
<input class="form-control" name="title" placeholder="New section title" required>
<button class="btn btn-outline-primary" type="submit">Add section</button>
</form>"#
    );
    html
}

/// Course editor; `existing` carries the course id and curriculum when editing
#[must_use]
pub fn course_form_page(
    user: &SessionUser,
    categories: &[Category],
    form: &CourseForm,
    existing: Option<(i64, &[Section])>,
    flash: &Flash,
) -> String {
    let (action, heading) = match existing {
        Some((id, _)) => (format!("/instructor/courses/{id}/edit"), "Edit course"),
        None => ("/instructor/courses/new".to_owned(), "New course"),
    };
    let status_field = if existing.is_some() {
        let mut options = String::new();
        for status in [CourseStatus::Incomplete, CourseStatus::Complete] {
            let _ = write!(
                options,
                r#"<option value="{}"{}>{}</option>"#,
                status.as_str(),
                if form.status == status.as_str() { " selected" } else { "" },
                status.label()
            );
        }
        format!(
            r#"<div class="mb-3"><label class="form-label" for="status">Status</label><select class="form-select" id="status" name="status">{options}</select></div>"#
        )
    } else {
        String::new()
    };
    let curriculum = existing.map_or_else(String::new, |(id, sections)| curriculum_editor(id, sections));

    let body = format!(
        r#"{nav}<h1 class="h3 fw-bold mb-4">{heading}</h1>{flash}
<form method="post" action="{action}">
<div class="mb-3"><label class="form-label" for="title">Title</label>
<input class="form-control" id="title" name="title" value="{title}" required maxlength="200"></div>
<div class="mb-3"><label class="form-label" for="description">Short description</label>
<textarea class="form-control" id="description" name="description" rows="2">{description}</textarea></div>
<div class="mb-3"><label class="form-label" for="detail_html">Full description</label>
<textarea class="form-control" id="detail_html" name="detail_html" rows="8">{detail}</textarea></div>
<div class="mb-3"><label class="form-label" for="image_url">Cover image URL</label>
<input class="form-control" id="image_url" name="image_url" type="url" value="{image}"></div>
<div class="row">
<div class="col-md-4 mb-3"><label class="form-label" for="current_price">Price (VND)</label>
<input class="form-control" id="current_price" name="current_price" type="number" min="0" value="{current}"></div>
<div class="col-md-4 mb-3"><label class="form-label" for="original_price">List price (VND)</label>
<input class="form-control" id="original_price" name="original_price" type="number" min="0" value="{original}"></div>
<div class="col-md-4 mb-3"><label class="form-label" for="category_id">Category</label>
<select class="form-select" id="category_id" name="category_id">{categories}</select></div>
</div>
{status_field}
<button class="btn btn-primary" type="submit">Save course</button>
</form>
{curriculum}"#,
        nav = instructor_nav(if existing.is_some() { "/instructor/dashboard" } else { "/instructor/courses/new" }),
        flash = flash.render(),
        title = attr(&form.title),
        description = esc(&form.description),
        detail = esc(&form.detail_html),
        image = attr(&form.image_url),
        current = attr(&form.current_price),
        original = attr(&form.original_price),
        categories = category_options(categories, &form.category_id),
    );
    page(heading, Some(user), &body)
}

/// Public profile editor
#[must_use]
pub fn profile_page(user: &SessionUser, instructor: &Instructor, flash: &Flash) -> String {
    let body = format!(
        r#"{nav}{flash}
<div class="row"><div class="col-lg-6">
<form method="post" action="/instructor/profile">
<div class="mb-3"><label class="form-label" for="name">Display name</label>
<input class="form-control" id="name" name="name" value="{name}" required maxlength="100"></div>
<div class="mb-3"><label class="form-label" for="bio">Bio</label>
<textarea class="form-control" id="bio" name="bio" rows="6">{bio}</textarea></div>
<button class="btn btn-primary" type="submit">Save profile</button>
</form>
</div></div>"#,
        nav = instructor_nav("/instructor/profile"),
        flash = flash.render(),
        name = attr(&instructor.name),
        bio = esc(instructor.bio.as_deref().unwrap_or_default()),
    );
    page("Instructor profile", Some(user), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user() -> SessionUser {
        SessionUser {
            account_id: 2,
            role: Role::Instructor,
            name: "Minh".to_owned(),
        }
    }

    #[test]
    fn test_new_course_form_has_no_status_or_curriculum() {
        let html = course_form_page(&user(), &[], &CourseForm::default(), None, &Flash::default());
        assert!(html.contains(r#"action="/instructor/courses/new""#));
        assert!(!html.contains(r#"name="status""#));
        assert!(!html.contains("Add section"));
    }

    #[test]
    fn test_edit_form_preselects_category_and_status() {
        let categories = vec![Category {
            category_id: 4,
            name: "Design".to_owned(),
            parent_id: None,
        }];
        let form = CourseForm {
            title: "Figma".to_owned(),
            category_id: "4".to_owned(),
            status: "complete".to_owned(),
            ..CourseForm::default()
        };
        let html = course_form_page(&user(), &categories, &form, Some((9, &[])), &Flash::default());
        assert!(html.contains(r#"<option value="4" selected>Design</option>"#));
        assert!(html.contains(r#"<option value="complete" selected>"#));
        assert!(html.contains("/instructor/courses/9/sections"));
    }
}
