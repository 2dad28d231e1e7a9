// ABOUTME: Instructor area routes: overview, course dashboard, course editor, curriculum and profile
// ABOUTME: Every mutation goes through ownership-checked database calls keyed by the signed-in instructor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::{redirect_notice, redirect_on_error};
use crate::auth::extractors::RequireInstructor;
use crate::auth::validation::validate_full_name;
use crate::database::courses::CourseInput;
use crate::database::curriculum::LectureInput;
use crate::errors::{AppError, AppResult, PageResult};
use crate::models::CourseStatus;
use crate::resources::ServerResources;
use crate::views::{self, instructor::CourseForm, Flash};

/// New section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SectionForm {
    /// Section title
    pub title: String,
}

/// New lecture
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LectureForm {
    /// Course the section belongs to, used for the redirect only
    pub course_id: Option<i64>,
    /// Lecture title
    pub title: String,
    /// Video location
    pub video_url: String,
    /// Length in minutes, fractions allowed
    pub duration_minutes: String,
    /// `true` when the checkbox is ticked
    pub is_preview: Option<String>,
}

/// Instructor profile form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstructorProfileForm {
    /// Display name
    pub name: String,
    /// Bio, empty to clear
    pub bio: String,
}

fn parse_price(raw: &str, field: &str) -> AppResult<Option<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::invalid_input(format!("{field} must be a whole number of VND")))
}

/// Convert submitted fields into a course input; a missing list price equals the selling price
///
/// # Errors
///
/// Returns `InvalidInput` for unparsable numbers
pub fn course_input(form: &CourseForm) -> AppResult<CourseInput> {
    let current_price = parse_price(&form.current_price, "Price")?.unwrap_or(0);
    let original_price = parse_price(&form.original_price, "List price")?.unwrap_or(current_price);
    let category_id = match form.category_id.trim() {
        "" => None,
        raw => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::invalid_input("Unknown category"))?,
        ),
    };
    Ok(CourseInput {
        title: form.title.clone(),
        description: form.description.clone(),
        detail_html: form.detail_html.clone(),
        image_url: Some(form.image_url.clone()),
        current_price,
        original_price,
        category_id,
    })
}

/// Convert the lecture form; minutes become whole seconds
///
/// # Errors
///
/// Returns `InvalidInput` for an unparsable or negative duration
pub fn lecture_input(form: &LectureForm) -> AppResult<LectureInput> {
    let minutes = match form.duration_minutes.trim() {
        "" => 0.0,
        raw => raw
            .parse::<f64>()
            .ok()
            .filter(|m| m.is_finite() && *m >= 0.0)
            .ok_or_else(|| AppError::invalid_input("Duration must be a positive number of minutes"))?,
    };
    let duration_seconds = (minutes * 60.0).round() as i64;
    Ok(LectureInput {
        title: form.title.clone(),
        video_url: Some(form.video_url.clone()),
        duration_seconds,
        is_preview: form.is_preview.as_deref() == Some("true"),
    })
}

/// Instructor area routes
pub struct InstructorRoutes;

impl InstructorRoutes {
    /// Create instructor routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/instructor", get(Self::handle_overview))
            .route("/instructor/dashboard", get(Self::handle_dashboard))
            .route(
                "/instructor/profile",
                get(Self::handle_profile_page).post(Self::handle_profile_update),
            )
            .route(
                "/instructor/courses/new",
                get(Self::handle_new_course_page).post(Self::handle_create_course),
            )
            .route(
                "/instructor/courses/:id/edit",
                get(Self::handle_edit_course_page).post(Self::handle_update_course),
            )
            .route("/instructor/courses/:id/delete", post(Self::handle_delete_course))
            .route("/instructor/courses/:id/sections", post(Self::handle_add_section))
            .route("/instructor/sections/:id/lectures", post(Self::handle_add_lecture))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources, instructor), fields(route = "instructor_overview"))]
    async fn handle_overview(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
    ) -> PageResult<Response> {
        let stats = resources
            .database
            .instructor_stats(instructor.instructor.instructor_id)
            .await?;
        Ok(Html(views::instructor::overview_page(
            &instructor.user,
            &instructor.instructor,
            &stats,
        ))
        .into_response())
    }

    #[tracing::instrument(skip(resources, instructor, flash), fields(route = "instructor_dashboard"))]
    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Query(flash): Query<Flash>,
    ) -> PageResult<Response> {
        let courses = resources
            .database
            .list_instructor_courses(instructor.instructor.instructor_id)
            .await?;
        Ok(Html(views::instructor::dashboard_page(&instructor.user, &courses, &flash)).into_response())
    }

    async fn handle_profile_page(
        instructor: RequireInstructor,
        Query(flash): Query<Flash>,
    ) -> Response {
        Html(views::instructor::profile_page(
            &instructor.user,
            &instructor.instructor,
            &flash,
        ))
        .into_response()
    }

    #[tracing::instrument(skip(resources, instructor, form), fields(route = "instructor_profile_update"))]
    async fn handle_profile_update(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Form(form): Form<InstructorProfileForm>,
    ) -> PageResult<Response> {
        const PAGE: &str = "/instructor/profile";
        let name = form.name.trim();
        if let Err(e) = validate_full_name(name) {
            return redirect_on_error(PAGE, e);
        }
        let bio = Some(form.bio.trim()).filter(|b| !b.is_empty());
        match resources
            .database
            .update_instructor_profile(instructor.instructor.instructor_id, name, bio)
            .await
        {
            Ok(()) => Ok(redirect_notice(PAGE, "Profile saved")),
            Err(e) => redirect_on_error(PAGE, e),
        }
    }

    /// Re-render the editor with the submitted values and an error banner
    async fn form_with_error(
        resources: &ServerResources,
        instructor: &RequireInstructor,
        form: &CourseForm,
        course_id: Option<i64>,
        error: AppError,
    ) -> PageResult<Response> {
        if !error.code.is_user_facing() {
            return Err(error.into());
        }
        let categories = resources.database.list_categories().await?;
        let sections = match course_id {
            Some(id) => resources.database.list_sections(id).await?,
            None => Vec::new(),
        };
        let html = views::instructor::course_form_page(
            &instructor.user,
            &categories,
            form,
            course_id.map(|id| (id, sections.as_slice())),
            &Flash::error(error.message),
        );
        Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
    }

    async fn handle_new_course_page(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
    ) -> PageResult<Response> {
        let categories = resources.database.list_categories().await?;
        Ok(Html(views::instructor::course_form_page(
            &instructor.user,
            &categories,
            &CourseForm::default(),
            None,
            &Flash::default(),
        ))
        .into_response())
    }

    #[tracing::instrument(skip(resources, instructor, form), fields(route = "create_course"))]
    async fn handle_create_course(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Form(form): Form<CourseForm>,
    ) -> PageResult<Response> {
        let instructor_id = instructor.instructor.instructor_id;
        let created = match course_input(&form) {
            Ok(input) => resources.database.create_course(instructor_id, input).await,
            Err(e) => Err(e),
        };
        match created {
            Ok(course) => {
                info!(instructor_id, course_id = course.course_id, "Course created");
                Ok(redirect_notice(
                    &format!("/instructor/courses/{}/edit", course.course_id),
                    "Course created. Add sections and lectures below.",
                ))
            }
            Err(e) => Self::form_with_error(&resources, &instructor, &form, None, e).await,
        }
    }

    #[tracing::instrument(skip(resources, instructor, flash), fields(route = "edit_course"))]
    async fn handle_edit_course_page(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Path(course_id): Path<i64>,
        Query(flash): Query<Flash>,
    ) -> PageResult<Response> {
        let course = resources
            .database
            .require_owned_course(course_id, instructor.instructor.instructor_id)
            .await?;
        let categories = resources.database.list_categories().await?;
        let sections = resources.database.list_sections(course_id).await?;
        Ok(Html(views::instructor::course_form_page(
            &instructor.user,
            &categories,
            &CourseForm::from_course(&course),
            Some((course_id, &sections)),
            &flash,
        ))
        .into_response())
    }

    #[tracing::instrument(skip(resources, instructor, form), fields(route = "update_course"))]
    async fn handle_update_course(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Path(course_id): Path<i64>,
        Form(form): Form<CourseForm>,
    ) -> PageResult<Response> {
        let instructor_id = instructor.instructor.instructor_id;
        let updated = async {
            let input = course_input(&form)?;
            let status = CourseStatus::parse(form.status.trim())?;
            resources
                .database
                .update_course(course_id, instructor_id, input, status)
                .await
        }
        .await;
        match updated {
            Ok(()) => {
                info!(instructor_id, course_id, "Course updated");
                Ok(redirect_notice(
                    &format!("/instructor/courses/{course_id}/edit"),
                    "Course saved",
                ))
            }
            Err(e) => Self::form_with_error(&resources, &instructor, &form, Some(course_id), e).await,
        }
    }

    #[tracing::instrument(skip(resources, instructor), fields(route = "delete_course"))]
    async fn handle_delete_course(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Path(course_id): Path<i64>,
    ) -> PageResult<Response> {
        const PAGE: &str = "/instructor/dashboard";
        match resources
            .database
            .delete_instructor_course(course_id, instructor.instructor.instructor_id)
            .await
        {
            Ok(()) => Ok(redirect_notice(PAGE, "Course deleted")),
            Err(e) => redirect_on_error(PAGE, e),
        }
    }

    #[tracing::instrument(skip(resources, instructor, form), fields(route = "add_section"))]
    async fn handle_add_section(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Path(course_id): Path<i64>,
        Form(form): Form<SectionForm>,
    ) -> PageResult<Response> {
        let page = format!("/instructor/courses/{course_id}/edit");
        match resources
            .database
            .add_section(course_id, instructor.instructor.instructor_id, &form.title)
            .await
        {
            Ok(_) => Ok(redirect_notice(&page, "Section added")),
            Err(e) => redirect_on_error(&page, e),
        }
    }

    #[tracing::instrument(skip(resources, instructor, form), fields(route = "add_lecture"))]
    async fn handle_add_lecture(
        State(resources): State<Arc<ServerResources>>,
        instructor: RequireInstructor,
        Path(section_id): Path<i64>,
        Form(form): Form<LectureForm>,
    ) -> PageResult<Response> {
        let page = form.course_id.map_or_else(
            || "/instructor/dashboard".to_owned(),
            |id| format!("/instructor/courses/{id}/edit"),
        );
        let added = match lecture_input(&form) {
            Ok(input) => {
                resources
                    .database
                    .add_lecture(section_id, instructor.instructor.instructor_id, &input)
                    .await
            }
            Err(e) => Err(e),
        };
        match added {
            Ok(_) => Ok(redirect_notice(&page, "Lecture added")),
            Err(e) => redirect_on_error(&page, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(current: &str, original: &str, category: &str) -> CourseForm {
        CourseForm {
            title: "Rust".to_owned(),
            current_price: current.to_owned(),
            original_price: original.to_owned(),
            category_id: category.to_owned(),
            ..CourseForm::default()
        }
    }

    #[test]
    fn test_course_input_prices() {
        let input = course_input(&form("199000", "", "")).unwrap();
        assert_eq!(input.current_price, 199_000);
        assert_eq!(input.original_price, 199_000);
        assert_eq!(input.category_id, None);

        let input = course_input(&form("", "", "3")).unwrap();
        assert_eq!(input.current_price, 0);
        assert_eq!(input.category_id, Some(3));

        assert!(course_input(&form("12.5", "", "")).is_err());
        assert!(course_input(&form("1", "", "web")).is_err());
    }

    #[test]
    fn test_lecture_input_minutes() {
        let mut lecture = LectureForm {
            title: "Intro".to_owned(),
            duration_minutes: "2.5".to_owned(),
            is_preview: Some("true".to_owned()),
            ..LectureForm::default()
        };
        let input = lecture_input(&lecture).unwrap();
        assert_eq!(input.duration_seconds, 150);
        assert!(input.is_preview);

        lecture.duration_minutes = String::new();
        lecture.is_preview = None;
        let input = lecture_input(&lecture).unwrap();
        assert_eq!(input.duration_seconds, 0);
        assert!(!input.is_preview);

        lecture.duration_minutes = "-1".to_owned();
        assert!(lecture_input(&lecture).is_err());
    }
}
