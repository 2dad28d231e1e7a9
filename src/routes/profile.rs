// ABOUTME: Profile routes: account details, password and email changes, student course lists
// ABOUTME: Email changes are confirmed by a code sent to the new address before they apply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::auth::AuthService;
use super::{redirect_notice, redirect_on_error};
use crate::auth::extractors::{RequireStudent, RequireUser};
use crate::auth::password::{hash_otp_code, hash_password, validate_password, verify_password};
use crate::auth::validation::{is_valid_email, validate_full_name};
use crate::database::accounts::normalize_email;
use crate::errors::{AppError, AppResult, PageResult};
use crate::models::{Account, OtpPurpose};
use crate::resources::ServerResources;
use crate::security::cookies::set_session_cookie;
use crate::views::{self, Flash};

/// Account details form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    /// Display name
    pub full_name: String,
    /// Avatar URL, empty to remove
    pub avatar_url: String,
}

/// Password change form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PasswordForm {
    /// Current password; ignored for accounts without one
    pub current_password: String,
    /// New password
    pub new_password: String,
    /// Repeated new password
    pub confirm_password: String,
}

/// Email change request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmailForm {
    /// Address to switch to
    pub new_email: String,
}

/// Code confirming an email change
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CodeForm {
    /// 6-digit code
    pub code: String,
}

/// `?email=` on the confirmation page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PendingEmailQuery {
    /// Address the code was sent to
    pub email: Option<String>,
}

/// Profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/profile", get(Self::handle_profile))
            .route("/profile/update", post(Self::handle_update))
            .route(
                "/profile/change-password",
                get(Self::handle_password_page).post(Self::handle_change_password),
            )
            .route(
                "/profile/change-email",
                get(Self::handle_email_page).post(Self::handle_change_email),
            )
            .route(
                "/profile/verify-email",
                get(Self::handle_verify_email_page).post(Self::handle_verify_email),
            )
            .route("/profile/my-courses", get(Self::handle_my_courses))
            .route("/profile/watchlist", get(Self::handle_watchlist))
            .route(
                "/profile/watchlist/:course_id/remove",
                post(Self::handle_watchlist_remove),
            )
            .route("/profile/reviews", get(Self::handle_reviews))
            .with_state(resources)
    }

    async fn load_account(resources: &ServerResources, account_id: i64) -> AppResult<Account> {
        resources
            .database
            .get_account(account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account"))
    }

    /// Redirect that also refreshes the session cookie, so the new name shows at once
    fn refreshed_session_redirect(
        resources: &ServerResources,
        account: &Account,
        path: &str,
        message: &str,
    ) -> AppResult<Response> {
        let token = resources.sessions.issue(account)?;
        let mut response = redirect_notice(path, message);
        set_session_cookie(
            response.headers_mut(),
            &token,
            resources.sessions.ttl_secs(),
            resources.secure_cookies(),
        );
        Ok(response)
    }

    #[tracing::instrument(skip(resources, user, flash), fields(route = "profile"))]
    async fn handle_profile(
        State(resources): State<Arc<ServerResources>>,
        RequireUser(user): RequireUser,
        Query(flash): Query<Flash>,
    ) -> PageResult<Response> {
        let account = Self::load_account(&resources, user.account_id).await?;
        Ok(Html(views::profile::profile_page(&user, &account, &flash)).into_response())
    }

    #[tracing::instrument(skip(resources, user, form), fields(route = "profile_update"))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        RequireUser(user): RequireUser,
        Form(form): Form<ProfileForm>,
    ) -> PageResult<Response> {
        let full_name = form.full_name.trim();
        if let Err(e) = validate_full_name(full_name) {
            return redirect_on_error("/profile", e);
        }
        let avatar_url = Some(form.avatar_url.trim()).filter(|url| !url.is_empty());
        if let Err(e) = resources
            .database
            .update_account_profile(user.account_id, full_name, avatar_url)
            .await
        {
            return redirect_on_error("/profile", e);
        }
        let account = Self::load_account(&resources, user.account_id).await?;
        info!(account_id = user.account_id, "Profile updated");
        Ok(Self::refreshed_session_redirect(
            &resources,
            &account,
            "/profile",
            "Profile saved",
        )?)
    }

    async fn handle_password_page(
        RequireUser(user): RequireUser,
        Query(flash): Query<Flash>,
    ) -> Response {
        Html(views::profile::change_password_page(&user, &flash)).into_response()
    }

    /// Check and apply a password change
    async fn change_password(
        resources: &ServerResources,
        account: &Account,
        form: &PasswordForm,
    ) -> AppResult<()> {
        // Accounts created through Google sign-in have no password yet
        if !account.password_hash.is_empty()
            && !verify_password(&form.current_password, &account.password_hash).await?
        {
            return Err(AppError::invalid_input("Current password is incorrect"));
        }
        validate_password(&form.new_password)?;
        if form.new_password != form.confirm_password {
            return Err(AppError::invalid_input("New passwords do not match"));
        }
        let hash = hash_password(&form.new_password).await?;
        resources
            .database
            .update_password_hash(account.account_id, &hash)
            .await
    }

    #[tracing::instrument(skip(resources, user, form), fields(route = "change_password"))]
    async fn handle_change_password(
        State(resources): State<Arc<ServerResources>>,
        RequireUser(user): RequireUser,
        Form(form): Form<PasswordForm>,
    ) -> PageResult<Response> {
        const PAGE: &str = "/profile/change-password";
        let account = Self::load_account(&resources, user.account_id).await?;
        match Self::change_password(&resources, &account, &form).await {
            Ok(()) => {
                info!(account_id = user.account_id, "Password changed");
                Ok(redirect_notice(PAGE, "Password changed"))
            }
            Err(e) => redirect_on_error(PAGE, e),
        }
    }

    async fn handle_email_page(
        State(resources): State<Arc<ServerResources>>,
        RequireUser(user): RequireUser,
        Query(flash): Query<Flash>,
    ) -> PageResult<Response> {
        let account = Self::load_account(&resources, user.account_id).await?;
        Ok(Html(views::profile::change_email_page(&user, &account.email, &flash)).into_response())
    }

    /// Validate the new address and send it a confirmation code
    async fn request_email_change(
        resources: &Arc<ServerResources>,
        account: &Account,
        new_email: &str,
    ) -> AppResult<()> {
        if !is_valid_email(new_email) {
            return Err(AppError::invalid_input("Please enter a valid email address"));
        }
        if new_email == account.email {
            return Err(AppError::invalid_input("That is already your email address"));
        }
        if resources.database.get_account_by_email(new_email).await?.is_some() {
            return Err(AppError::already_exists("That email address is already in use"));
        }
        AuthService::new(resources.clone())
            .issue_code(account, OtpPurpose::EmailChange, new_email, Some(new_email))
            .await
    }

    #[tracing::instrument(skip(resources, user, form), fields(route = "change_email"))]
    async fn handle_change_email(
        State(resources): State<Arc<ServerResources>>,
        RequireUser(user): RequireUser,
        Form(form): Form<EmailForm>,
    ) -> PageResult<Response> {
        let account = Self::load_account(&resources, user.account_id).await?;
        let new_email = normalize_email(&form.new_email);
        match Self::request_email_change(&resources, &account, &new_email).await {
            Ok(()) => Ok(redirect_notice(
                &format!(
                    "/profile/verify-email?email={}",
                    urlencoding::encode(&new_email)
                ),
                "We sent a verification code to your new address",
            )),
            Err(e) => redirect_on_error("/profile/change-email", e),
        }
    }

    async fn handle_verify_email_page(
        RequireUser(user): RequireUser,
        Query(query): Query<PendingEmailQuery>,
        Query(flash): Query<Flash>,
    ) -> Response {
        Html(views::profile::verify_email_page(
            &user,
            query.email.as_deref(),
            &flash,
        ))
        .into_response()
    }

    #[tracing::instrument(skip(resources, user, form), fields(route = "verify_email"))]
    async fn handle_verify_email(
        State(resources): State<Arc<ServerResources>>,
        RequireUser(user): RequireUser,
        Form(form): Form<CodeForm>,
    ) -> PageResult<Response> {
        let verified = match resources
            .database
            .verify_otp(
                user.account_id,
                OtpPurpose::EmailChange,
                &hash_otp_code(form.code.trim()),
            )
            .await
        {
            Ok(verified) => verified,
            Err(e) => return redirect_on_error("/profile/verify-email", e),
        };
        let Some(new_email) = verified.new_email else {
            warn!(account_id = user.account_id, "Email change code without an address");
            return redirect_on_error(
                "/profile/change-email",
                AppError::invalid_input("Please request a new code"),
            );
        };
        if let Err(e) = resources
            .database
            .update_account_email(user.account_id, &new_email)
            .await
        {
            return redirect_on_error("/profile/change-email", e);
        }
        info!(account_id = user.account_id, "Email address changed");
        Ok(redirect_notice("/profile", "Email address updated"))
    }

    #[tracing::instrument(skip(resources, student), fields(route = "my_courses"))]
    async fn handle_my_courses(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
    ) -> PageResult<Response> {
        let courses = resources
            .database
            .list_enrollments_for_student(student.student_id)
            .await?;
        Ok(Html(views::profile::my_courses_page(&student.user, &courses)).into_response())
    }

    #[tracing::instrument(skip(resources, student, flash), fields(route = "watchlist"))]
    async fn handle_watchlist(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
        Query(flash): Query<Flash>,
    ) -> PageResult<Response> {
        let entries = resources.database.list_watchlist(student.student_id).await?;
        Ok(Html(views::profile::watchlist_page(&student.user, &entries, &flash)).into_response())
    }

    #[tracing::instrument(skip(resources, student), fields(route = "watchlist_remove"))]
    async fn handle_watchlist_remove(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
        Path(course_id): Path<i64>,
    ) -> PageResult<Response> {
        let removed = resources
            .database
            .remove_from_watchlist(student.student_id, course_id)
            .await?;
        let message = if removed {
            "Removed from your watchlist"
        } else {
            "That course was not in your watchlist"
        };
        Ok(redirect_notice("/profile/watchlist", message))
    }

    #[tracing::instrument(skip(resources, student), fields(route = "my_reviews"))]
    async fn handle_reviews(
        State(resources): State<Arc<ServerResources>>,
        student: RequireStudent,
    ) -> PageResult<Response> {
        let reviews = resources
            .database
            .list_reviews_by_student(student.student_id)
            .await?;
        Ok(Html(views::profile::my_reviews_page(&student.user, &reviews)).into_response())
    }
}
