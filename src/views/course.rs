// ABOUTME: Course detail page: overview, curriculum, instructor, reviews, gallery and related courses
// ABOUTME: Shows enroll, watchlist and continue-learning actions depending on the viewer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::fmt::Write;

use super::catalog::course_grid;
use super::helpers::{
    attr, discount_percent, esc, format_count, format_date, format_duration, format_hours,
    format_rating, format_vnd, stars,
};
use super::layout::page;
use crate::auth::session::SessionUser;
use crate::models::{CourseDetails, Review, Role, Section};

/// What the current viewer may do on the page
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewerState {
    /// Already enrolled
    pub enrolled: bool,
    /// Saved in the watchlist
    pub in_watchlist: bool,
}

fn curriculum(sections: &[Section]) -> String {
    if sections.is_empty() {
        return r#"<p class="text-muted">The curriculum has not been published yet.</p>"#.to_owned();
    }
    let mut html = String::from(r#"<div class="accordion" id="curriculum">"#);
    for (index, section) in sections.iter().enumerate() {
        let _ = write!(
            html,
            r##"<div class="accordion-item">
<h3 class="accordion-header"><button class="accordion-button{collapsed}" type="button" data-bs-toggle="collapse" data-bs-target="#section-{id}">
{title} <span class="ms-auto me-3 small text-muted">{count} lectures · {length}</span></button></h3>
<div id="section-{id}" class="accordion-collapse collapse{show}"><ul class="list-group list-group-flush">"##,
            collapsed = if index == 0 { "" } else { " collapsed" },
            show = if index == 0 { " show" } else { "" },
            id = section.section_id,
            title = esc(&section.title),
            count = section.lectures.len(),
            length = format_duration(section.duration_seconds()),
        );
        for lecture in &section.lectures {
            let preview = match (lecture.is_preview, lecture.video_url.as_deref()) {
                (true, Some(url)) => format!(
                    r#" <a class="badge bg-info text-dark text-decoration-none" href="{}" target="_blank" rel="noopener">Preview</a>"#,
                    attr(url)
                ),
                _ => String::new(),
            };
            let _ = write!(
                html,
                r#"<li class="list-group-item d-flex justify-content-between"><span><i class="bi bi-play-circle me-2"></i>{}{preview}</span><span class="text-muted small">{}</span></li>"#,
                esc(&lecture.title),
                format_duration(lecture.duration_seconds),
            );
        }
        html.push_str("</ul></div></div>");
    }
    html.push_str("</div>");
    html
}

/// Review list, newest first
#[must_use]
pub fn review_list(reviews: &[Review], show_course: bool) -> String {
    if reviews.is_empty() {
        return r#"<p class="text-muted">No reviews yet.</p>"#.to_owned();
    }
    let mut html = String::new();
    for review in reviews {
        let heading = if show_course {
            format!(
                r#"<a href="/courses/{}">{}</a>"#,
                review.course_id,
                esc(&review.course_title)
            )
        } else {
            esc(&review.student_name).into_owned()
        };
        let _ = write!(
            html,
            r#"<div class="border-bottom py-3">
<div class="d-flex justify-content-between"><strong>{heading}</strong><span class="text-muted small">{date}</span></div>
<div>{stars}</div>
<p class="mb-0">{feedback}</p>
</div>"#,
            date = format_date(&review.created_at),
            stars = stars(review.rating as f64),
            feedback = esc(&review.feedback),
        );
    }
    html
}

fn actions(details: &CourseDetails, user: Option<&SessionUser>, viewer: ViewerState) -> String {
    let id = details.course.course_id;
    match user {
        None => format!(
            r#"<a class="btn btn-primary btn-lg w-100 mb-2" href="/auth/login?return_to=%2Fcourses%2F{id}">Log in to enroll</a>"#
        ),
        Some(user) if user.role == Role::Student => {
            let primary = if viewer.enrolled {
                format!(r#"<a class="btn btn-success btn-lg w-100 mb-2" href="/learn/{id}">Continue learning</a>"#)
            } else {
                format!(
                    r#"<button class="btn btn-primary btn-lg w-100 mb-2" id="enrollButton" data-course-id="{id}">Enroll now</button>"#
                )
            };
            let watch = if viewer.in_watchlist {
                format!(
                    r#"<form method="post" action="/courses/{id}/unfavorite"><button class="btn btn-outline-danger w-100" type="submit"><i class="bi bi-heart-fill"></i> Remove from watchlist</button></form>"#
                )
            } else {
                format!(
                    r#"<form method="post" action="/courses/{id}/favorite"><button class="btn btn-outline-secondary w-100" type="submit"><i class="bi bi-heart"></i> Add to watchlist</button></form>"#
                )
            };
            format!("{primary}{watch}")
        }
        Some(_) => String::new(),
    }
}

/// Full course detail page
#[must_use]
pub fn detail_page(
    user: Option<&SessionUser>,
    details: &CourseDetails,
    viewer: ViewerState,
) -> String {
    let course = &details.course;
    let category = details.category.as_ref().map_or_else(String::new, |c| {
        format!(
            r#"<a class="badge bg-light text-primary text-decoration-none" href="/category/{}">{}</a>"#,
            urlencoding::encode(&c.name),
            esc(&c.name)
        )
    });
    let discount = discount_percent(course.current_price, course.original_price).map_or_else(
        String::new,
        |percent| {
            format!(
                r#" <del class="text-muted">{}</del> <span class="badge bg-danger">-{percent}%</span>"#,
                format_vnd(course.original_price)
            )
        },
    );
    let bestseller = if course.is_bestseller {
        r#"<span class="badge bg-warning text-dark ms-2">Bestseller</span>"#
    } else {
        ""
    };
    let mut gallery = String::new();
    if !details.images.is_empty() {
        gallery.push_str(r#"<h2 class="h5 fw-bold mt-5 mb-3">Gallery</h2><div class="row g-3">"#);
        for image in &details.images {
            let _ = write!(
                gallery,
                r#"<div class="col-6 col-md-4"><img class="img-fluid rounded" src="{}" alt="{}"></div>"#,
                attr(&image.image_url),
                attr(image.description.as_deref().unwrap_or_default())
            );
        }
        gallery.push_str("</div>");
    }

    let body = format!(
        r#"<div class="row g-5">
<div class="col-lg-8">
{category}{bestseller}
<h1 class="fw-bold mt-2">{title}</h1>
<p class="lead text-muted">{description}</p>
<div class="mb-3">{rating} {stars} <span class="text-muted">({reviews} reviews · {students} students · {views} views)</span></div>
<div class="text-muted small mb-4">By <strong>{instructor}</strong> · {hours} · {lectures} lectures · Updated {updated}</div>
<h2 class="h5 fw-bold mb-3">About this course</h2>
<div class="course-detail mb-4">{detail_html}</div>
<h2 class="h5 fw-bold mb-3">Curriculum</h2>
{curriculum}
<h2 class="h5 fw-bold mt-5 mb-3">Instructor</h2>
<div class="card p-3"><strong>{instructor}</strong><p class="text-muted mb-0">{bio}</p><div class="small text-muted">{instructor_students} students</div></div>
{gallery}
<h2 class="h5 fw-bold mt-5 mb-3">Reviews</h2>
{review_list}
</div>
<div class="col-lg-4">
<div class="card shadow-sm sticky-top" style="top:1rem">
<img class="card-img-top" src="{image}" alt="{title_attr}">
<div class="card-body">
<div class="fs-3 fw-bold text-primary mb-3">{price}{discount}</div>
{actions}
<div id="enrollMessage" class="mt-2 small"></div>
</div>
</div>
</div>
</div>
<section class="mt-5"><h2 class="h4 fw-bold mb-3">Related courses</h2><div class="row g-4">{related}</div></section>"#,
        title = esc(&course.title),
        title_attr = attr(&course.title),
        description = esc(&course.description),
        rating = format_rating(details.average_rating),
        stars = stars(details.average_rating),
        reviews = details.review_count,
        students = format_count(details.enrollment_count),
        views = format_count(course.view_count),
        instructor = esc(&details.instructor.name),
        hours = format_hours(course.total_hours),
        lectures = course.total_lectures,
        updated = format_date(&course.updated_at),
        detail_html = esc(&course.detail_html).replace('\n', "<br>"),
        curriculum = curriculum(&details.sections),
        bio = esc(details.instructor.bio.as_deref().unwrap_or_default()),
        instructor_students = format_count(details.instructor.total_students),
        review_list = review_list(&details.reviews, false),
        image = attr(course.image_url.as_deref().unwrap_or("/static/placeholder.svg")),
        price = format_vnd(course.current_price),
        actions = actions(details, user, viewer),
        related = course_grid(&details.related, "No related courses."),
    );
    page(&course.title, user, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lecture;

    fn section(section_id: i64, title: &str) -> Section {
        Section {
            section_id,
            course_id: 1,
            title: title.to_owned(),
            order_index: section_id,
            lectures: vec![Lecture {
                lecture_id: section_id * 10,
                section_id,
                title: "Intro <1>".to_owned(),
                video_url: None,
                duration_seconds: 600,
                is_preview: false,
                order_index: 1,
            }],
        }
    }

    #[test]
    fn test_curriculum_links_accordion_panels() {
        let html = curriculum(&[section(7, "Basics"), section(8, "Next steps")]);
        assert!(html.contains(r##"data-bs-target="#section-7""##));
        assert!(html.contains(r#"id="section-8" class="accordion-collapse collapse""#));
        assert!(html.contains("Intro &lt;1&gt;"));
        assert_eq!(html.matches("accordion-item").count(), 2);
    }

    #[test]
    fn test_empty_curriculum_says_so() {
        assert!(curriculum(&[]).contains("not been published"));
    }
}
