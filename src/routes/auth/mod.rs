// ABOUTME: Authentication route handlers for registration, email verification, login and logout
// ABOUTME: AuthService holds the business logic; handlers translate it into pages and redirects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Authentication routes
//!
//! Registration creates an unverified student account and emails a one-time
//! code. Login refuses unverified accounts by sending a fresh code and showing
//! the verification form. Successful logins set the `session` cookie and
//! redirect by role.
//!
//! ## Module Structure
//! - `types` - Form and query types for auth endpoints

mod types;

pub use types::{
    safe_return_to, AuthPageQuery, LoginForm, LoginOutcome, RegisterForm, ResendForm, VerifyForm,
};

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tracing::{debug, info, warn};

use crate::auth::extractors::MaybeUser;
use crate::auth::password::{
    generate_otp_code, hash_otp_code, hash_password, validate_password, verify_password,
};
use crate::auth::validation::{is_valid_email, validate_full_name};
use crate::database::accounts::{normalize_email, NewAccount};
use crate::errors::{AppError, AppResult, ErrorCode, PageResult};
use crate::external::MailMessage;
use crate::models::{Account, AuthProvider, OtpPurpose, Role};
use crate::resources::ServerResources;
use crate::security::cookies::{clear_session_cookie, set_session_cookie};
use crate::views::{self, Flash};

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    resources: Arc<ServerResources>,
}

impl AuthService {
    /// Creates a new authentication service
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Generate, store and email a one-time code
    ///
    /// # Errors
    ///
    /// Returns an error if the code cannot be stored or the email cannot be sent
    pub async fn issue_code(
        &self,
        account: &Account,
        purpose: OtpPurpose,
        send_to: &str,
        new_email: Option<&str>,
    ) -> AppResult<()> {
        let code = generate_otp_code();
        self.resources
            .database
            .create_otp(account.account_id, purpose, &hash_otp_code(&code), new_email)
            .await?;
        self.resources
            .mailer
            .send(&MailMessage::otp(send_to, &account.full_name, &code, purpose))
            .await
    }

    /// Create an unverified student account and send its verification code
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for bad fields, `ResourceAlreadyExists` for a
    /// registered email, or a storage/mail error
    #[tracing::instrument(skip(self, form), fields(route = "register"))]
    pub async fn register(&self, form: &RegisterForm) -> AppResult<Account> {
        info!("Student registration attempt");

        validate_full_name(&form.full_name)?;
        let email = normalize_email(&form.email);
        if !is_valid_email(&email) {
            return Err(AppError::invalid_input("Please enter a valid email address"));
        }
        validate_password(&form.password)?;
        if form.password != form.confirm_password {
            return Err(AppError::invalid_input("Passwords do not match"));
        }

        if self
            .resources
            .database
            .get_account_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists("Email already registered"));
        }

        let password_hash = hash_password(&form.password).await?;
        let account = self
            .resources
            .database
            .create_student_account(&NewAccount {
                email: email.clone(),
                password_hash,
                full_name: form.full_name.trim().to_owned(),
                is_verified: false,
                avatar_url: None,
                auth_provider: AuthProvider::Email,
            })
            .await?;

        info!(account_id = account.account_id, "Student registered, awaiting verification");
        // The account exists now; a failed send is recovered through resend
        if let Err(e) = self
            .issue_code(&account, OtpPurpose::Register, &email, None)
            .await
        {
            warn!(account_id = account.account_id, error = %e, "Verification code not delivered");
        }
        Ok(account)
    }

    /// Confirm a registration code
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unknown accounts or rejected codes
    #[tracing::instrument(skip(self, form), fields(route = "verify"))]
    pub async fn verify_registration(&self, form: &VerifyForm) -> AppResult<Account> {
        let account = self
            .resources
            .database
            .get_account_by_email(&form.email)
            .await?
            .ok_or_else(|| AppError::invalid_input("No pending verification for this email"))?;
        if account.is_verified {
            debug!(account_id = account.account_id, "Account already verified");
            return Ok(account);
        }

        self.resources
            .database
            .verify_otp(
                account.account_id,
                OtpPurpose::Register,
                &hash_otp_code(form.code.trim()),
            )
            .await?;
        self.resources
            .database
            .mark_account_verified(account.account_id)
            .await?;

        info!(account_id = account.account_id, "Email verified");
        Ok(Account {
            is_verified: true,
            ..account
        })
    }

    /// Send a new registration code, invalidating earlier ones
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unknown or already verified accounts
    pub async fn resend_code(&self, email: &str) -> AppResult<Account> {
        let account = self
            .resources
            .database
            .get_account_by_email(email)
            .await?
            .ok_or_else(|| AppError::invalid_input("No pending verification for this email"))?;
        if account.is_verified {
            return Err(AppError::invalid_input(
                "This email is already verified. Please log in.",
            ));
        }
        let send_to = account.email.clone();
        self.issue_code(&account, OtpPurpose::Register, &send_to, None)
            .await?;
        Ok(account)
    }

    /// Check credentials
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for unknown emails or wrong passwords
    #[tracing::instrument(skip(self, form), fields(route = "login"))]
    pub async fn login(&self, form: &LoginForm) -> AppResult<LoginOutcome> {
        debug!("Login attempt");
        let account = self
            .resources
            .database
            .get_account_by_email(&form.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        if account.password_hash.is_empty() {
            return Err(AppError::auth_invalid(
                "This account signs in with Google",
            ));
        }
        if !verify_password(&form.password, &account.password_hash).await? {
            warn!(account_id = account.account_id, "Invalid password");
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        if !account.is_verified {
            let send_to = account.email.clone();
            self.issue_code(&account, OtpPurpose::Register, &send_to, None)
                .await?;
            return Ok(LoginOutcome::NeedsVerification { account });
        }

        let token = self.resources.sessions.issue(&account)?;
        info!(account_id = account.account_id, role = account.role.as_str(), "User logged in");
        Ok(LoginOutcome::SignedIn { account, token })
    }

    /// Find or create the student account for a Google profile
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` if Google has not verified the email
    #[cfg(feature = "oauth")]
    pub async fn login_with_google(
        &self,
        profile: &crate::external::GoogleProfile,
    ) -> AppResult<(Account, String)> {
        if !profile.email_verified {
            return Err(AppError::auth_invalid(
                "Your Google email address is not verified",
            ));
        }
        let database = &self.resources.database;
        let account = match database.get_account_by_email(&profile.email).await? {
            Some(account) if account.is_verified => account,
            Some(account) => {
                // Whoever registered this address never confirmed it
                database
                    .claim_unverified_account(account.account_id, AuthProvider::Google)
                    .await?;
                warn!(
                    account_id = account.account_id,
                    "Google sign-in claimed an unverified account"
                );
                Account {
                    is_verified: true,
                    password_hash: String::new(),
                    auth_provider: AuthProvider::Google,
                    ..account
                }
            }
            None => {
                let email = normalize_email(&profile.email);
                let full_name = profile
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| email.split('@').next().unwrap_or("Student").to_owned());
                let account = database
                    .create_student_account(&NewAccount {
                        email,
                        password_hash: String::new(),
                        full_name,
                        is_verified: true,
                        avatar_url: profile.picture.clone(),
                        auth_provider: AuthProvider::Google,
                    })
                    .await?;
                info!(account_id = account.account_id, "Student created from Google sign-in");
                account
            }
        };
        let token = self.resources.sessions.issue(&account)?;
        Ok((account, token))
    }
}

/// Where a freshly signed-in account goes
#[must_use]
pub fn landing_path(role: Role, return_to: Option<&str>) -> String {
    match role {
        Role::Student => safe_return_to(return_to).unwrap_or_else(|| role.home_path().to_owned()),
        _ => role.home_path().to_owned(),
    }
}

/// Redirect carrying a fresh session cookie
#[must_use]
pub fn signed_in_redirect(resources: &ServerResources, token: &str, target: &str) -> Response {
    let mut headers = HeaderMap::new();
    set_session_cookie(
        &mut headers,
        token,
        resources.sessions.ttl_secs(),
        resources.secure_cookies(),
    );
    (headers, Redirect::to(target)).into_response()
}

fn form_status(error: &AppError) -> StatusCode {
    match error.code {
        ErrorCode::InvalidInput | ErrorCode::ResourceAlreadyExists | ErrorCode::AuthInvalid => {
            error.http_status()
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Authentication routes implementation (Axum)
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/auth/register",
                get(Self::handle_register_page).post(Self::handle_register),
            )
            .route(
                "/auth/verify",
                get(Self::handle_verify_page).post(Self::handle_verify),
            )
            .route("/auth/resend-otp", post(Self::handle_resend))
            .route(
                "/auth/login",
                get(Self::handle_login_page).post(Self::handle_login),
            )
            .route("/auth/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    async fn handle_register_page(MaybeUser(user): MaybeUser) -> Response {
        if let Some(user) = user {
            return Redirect::to(user.role.home_path()).into_response();
        }
        Html(views::auth::register_page("", "", &Flash::default())).into_response()
    }

    #[tracing::instrument(skip(resources, form), fields(route = "register"))]
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<RegisterForm>,
    ) -> PageResult<Response> {
        let service = AuthService::new(resources);
        match service.register(&form).await {
            Ok(account) => Ok(Html(views::auth::verify_page(
                &account.email,
                &Flash::notice("Account created. Check your inbox for the verification code."),
            ))
            .into_response()),
            Err(e) if e.code.is_user_facing() => Ok((
                form_status(&e),
                Html(views::auth::register_page(
                    &form.full_name,
                    &form.email,
                    &Flash::error(e.message),
                )),
            )
                .into_response()),
            Err(e) => Err(e.into()),
        }
    }

    async fn handle_verify_page(Query(query): Query<AuthPageQuery>) -> Response {
        let flash = Flash {
            notice: query.notice,
            error: query.error,
        };
        Html(views::auth::verify_page(
            query.email.as_deref().unwrap_or_default(),
            &flash,
        ))
        .into_response()
    }

    #[tracing::instrument(skip(resources, form), fields(route = "verify"))]
    async fn handle_verify(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<VerifyForm>,
    ) -> PageResult<Response> {
        let service = AuthService::new(resources);
        match service.verify_registration(&form).await {
            Ok(account) => {
                let target = format!(
                    "/auth/login?email={}&notice={}",
                    urlencoding::encode(&account.email),
                    urlencoding::encode("Email verified. You can now log in.")
                );
                Ok(Redirect::to(&target).into_response())
            }
            Err(e) if e.code.is_user_facing() => Ok((
                form_status(&e),
                Html(views::auth::verify_page(&form.email, &Flash::error(e.message))),
            )
                .into_response()),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(resources, form), fields(route = "resend_otp"))]
    async fn handle_resend(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<ResendForm>,
    ) -> PageResult<Response> {
        let service = AuthService::new(resources);
        let flash = match service.resend_code(&form.email).await {
            Ok(_) => Flash::notice("A new code is on its way."),
            Err(e) if e.code.is_user_facing() => Flash::error(e.message),
            Err(e) => return Err(e.into()),
        };
        Ok(Html(views::auth::verify_page(&form.email, &flash)).into_response())
    }

    async fn handle_login_page(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
        Query(query): Query<AuthPageQuery>,
    ) -> Response {
        if let Some(user) = user {
            return Redirect::to(&landing_path(user.role, query.return_to.as_deref()))
                .into_response();
        }
        let flash = Flash {
            notice: query.notice,
            error: query.error,
        };
        let return_to = safe_return_to(query.return_to.as_deref());
        Html(views::auth::login_page(
            query.email.as_deref().unwrap_or_default(),
            return_to.as_deref(),
            Self::google_enabled(&resources),
            &flash,
        ))
        .into_response()
    }

    #[tracing::instrument(skip(resources, form), fields(route = "login"))]
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<LoginForm>,
    ) -> PageResult<Response> {
        let service = AuthService::new(resources.clone());
        match service.login(&form).await {
            Ok(LoginOutcome::SignedIn { account, token }) => {
                let target = landing_path(account.role, form.return_to.as_deref());
                Ok(signed_in_redirect(&resources, &token, &target))
            }
            Ok(LoginOutcome::NeedsVerification { account }) => Ok(Html(views::auth::verify_page(
                &account.email,
                &Flash::error("Please verify your email first. We sent you a new code."),
            ))
            .into_response()),
            Err(e) if e.code.is_user_facing() => {
                let return_to = safe_return_to(form.return_to.as_deref());
                Ok((
                    form_status(&e),
                    Html(views::auth::login_page(
                        &form.email,
                        return_to.as_deref(),
                        Self::google_enabled(&resources),
                        &Flash::error(e.message),
                    )),
                )
                    .into_response())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn handle_logout(State(resources): State<Arc<ServerResources>>) -> Response {
        let mut headers = HeaderMap::new();
        clear_session_cookie(&mut headers, resources.secure_cookies());
        (headers, Redirect::to("/")).into_response()
    }

    #[cfg(feature = "oauth")]
    fn google_enabled(resources: &ServerResources) -> bool {
        resources.google.is_some()
    }

    #[cfg(not(feature = "oauth"))]
    fn google_enabled(_resources: &ServerResources) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_path_by_role() {
        assert_eq!(landing_path(Role::Admin, Some("/learn/1")), "/admin");
        assert_eq!(landing_path(Role::Instructor, None), "/instructor");
        assert_eq!(landing_path(Role::Student, Some("/learn/1")), "/learn/1");
        assert_eq!(landing_path(Role::Student, Some("https://x.io")), "/");
    }
}
