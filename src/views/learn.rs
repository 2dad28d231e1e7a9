// ABOUTME: Learning page: video player, lecture checklist with completion buttons, review form
// ABOUTME: Completion calls the JSON endpoint and updates the progress bar in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::collections::HashSet;
use std::fmt::Write;

use super::helpers::{attr, esc, format_duration};
use super::layout::{page, Flash};
use crate::auth::session::SessionUser;
use crate::models::{CourseDetails, Lecture, Review};

/// State of the learner in this course
#[derive(Debug)]
pub struct LearnState<'a> {
    /// Lectures already completed
    pub completed: &'a HashSet<i64>,
    /// Stored course progress
    pub progress: u8,
    /// Lecture being watched
    pub current: Option<&'a Lecture>,
    /// The learner's review, if written
    pub review: Option<&'a Review>,
}

fn player(course_id: i64, lecture: Option<&Lecture>, completed: &HashSet<i64>) -> String {
    let Some(lecture) = lecture else {
        return r#"<div class="ratio ratio-16x9 bg-dark rounded d-flex align-items-center justify-content-center text-white">This course has no lectures yet.</div>"#.to_owned();
    };
    let video = lecture.video_url.as_deref().map_or_else(
        || r#"<div class="ratio ratio-16x9 bg-dark rounded"></div>"#.to_owned(),
        |url| {
            format!(
                r#"<div class="ratio ratio-16x9"><iframe src="{}" title="{}" allowfullscreen></iframe></div>"#,
                attr(url),
                attr(&lecture.title)
            )
        },
    );
    let done = completed.contains(&lecture.lecture_id);
    format!(
        r#"{video}
<div class="d-flex justify-content-between align-items-center mt-3">
<h2 class="h5 fw-bold mb-0">{title}</h2>
<button class="btn {class} complete-lecture" data-url="/learn/{course_id}/lectures/{id}/complete" data-lecture-id="{id}"{disabled}>{label}</button>
</div>"#,
        title = esc(&lecture.title),
        id = lecture.lecture_id,
        class = if done { "btn-success" } else { "btn-outline-success" },
        disabled = if done { " disabled" } else { "" },
        label = if done { "Completed" } else { "Mark as complete" },
    )
}

fn lecture_list(details: &CourseDetails, state: &LearnState<'_>) -> String {
    let course_id = details.course.course_id;
    let current_id = state.current.map(|l| l.lecture_id);
    let mut html = String::new();
    for section in &details.sections {
        let _ = write!(
            html,
            r#"<div class="fw-semibold small text-uppercase text-muted mt-3 mb-1">{}</div><div class="list-group">"#,
            esc(&section.title)
        );
        for lecture in &section.lectures {
            let done = state.completed.contains(&lecture.lecture_id);
            let _ = write!(
                html,
                r#"<a class="list-group-item list-group-item-action d-flex justify-content-between{active}" href="/learn/{course_id}?lecture={id}" data-lecture-id="{id}">
<span><i class="bi {icon} me-2"></i>{title}</span><span class="small">{length}</span></a>"#,
                active = if current_id == Some(lecture.lecture_id) { " active" } else { "" },
                id = lecture.lecture_id,
                icon = if done { "bi-check-circle-fill text-success" } else { "bi-circle" },
                title = esc(&lecture.title),
                length = format_duration(lecture.duration_seconds),
            );
        }
        html.push_str("</div>");
    }
    html
}

fn review_form(course_id: i64, review: Option<&Review>) -> String {
    let rating = review.map_or(5, |r| r.rating);
    let mut stars = String::new();
    for value in (1..=5).rev() {
        let _ = write!(
            stars,
            r#"<option value="{value}"{}>{value} star{}</option>"#,
            if value == rating { " selected" } else { "" },
            if value == 1 { "" } else { "s" }
        );
    }
    format!(
        r#"<h2 class="h5 fw-bold mt-5 mb-3">{heading}</h2>
<form method="post" action="/learn/{course_id}/review">
<div class="mb-3"><select class="form-select w-auto" name="rating">{stars}</select></div>
<div class="mb-3"><textarea class="form-control" name="feedback" rows="4" maxlength="2000" required>{feedback}</textarea></div>
<button class="btn btn-primary" type="submit">Submit review</button>
</form>"#,
        heading = if review.is_some() { "Update your review" } else { "Review this course" },
        feedback = esc(review.map_or("", |r| r.feedback.as_str())),
    )
}

/// Learning page for an enrolled student
#[must_use]
pub fn learn_page(
    user: &SessionUser,
    details: &CourseDetails,
    state: &LearnState<'_>,
    flash: &Flash,
) -> String {
    let course_id = details.course.course_id;
    let body = format!(
        r#"{flash}
<div class="d-flex justify-content-between align-items-center mb-3">
<h1 class="h4 fw-bold mb-0"><a class="text-decoration-none" href="/courses/{course_id}">{title}</a></h1>
</div>
<div class="progress mb-4" id="courseProgress" role="progressbar" aria-valuenow="{progress}" aria-valuemin="0" aria-valuemax="100"><div class="progress-bar" style="width:{progress}%">{progress}%</div></div>
<div class="row g-4">
<div class="col-lg-8">{player}{review}</div>
<aside class="col-lg-4">{lectures}</aside>
</div>"#,
        flash = flash.render(),
        title = esc(&details.course.title),
        progress = state.progress,
        player = player(course_id, state.current, state.completed),
        review = review_form(course_id, state.review),
        lectures = lecture_list(details, state),
    );
    page(&format!("Learn: {}", details.course.title), Some(user), &body)
}
