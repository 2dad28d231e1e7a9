// ABOUTME: Google sign-in routes: redirect to the consent screen and handle the callback
// ABOUTME: A random state value in a short-lived cookie guards the callback against CSRF
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use uuid::Uuid;

use super::auth::{landing_path, signed_in_redirect, AuthService};
use super::{redirect_error, redirect_on_error};
use crate::constants::session::OAUTH_STATE_COOKIE;
use crate::errors::{AppError, AppResult, PageResult};
use crate::resources::ServerResources;
use crate::security::cookies::{clear_cookie, get_cookie_value, set_oauth_state_cookie};

const LOGIN_PAGE: &str = "/auth/login";

/// Query string Google sends back
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbackQuery {
    /// Authorization code
    pub code: Option<String>,
    /// Echoed state
    pub state: Option<String>,
    /// Set when the user declined
    pub error: Option<String>,
}

/// Constant-time comparison of the echoed state with the cookie
fn state_matches(cookie: Option<&str>, echoed: Option<&str>) -> bool {
    match (cookie, echoed) {
        (Some(expected), Some(actual)) if !expected.is_empty() => {
            expected.as_bytes().ct_eq(actual.as_bytes()).into()
        }
        _ => false,
    }
}

/// Google sign-in routes
pub struct OAuthRoutes;

impl OAuthRoutes {
    /// Create Google sign-in routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/google", get(Self::handle_start))
            .route("/auth/google/callback", get(Self::handle_callback))
            .with_state(resources)
    }

    #[tracing::instrument(skip(resources), fields(route = "google_start"))]
    async fn handle_start(State(resources): State<Arc<ServerResources>>) -> PageResult<Response> {
        let Some(google) = resources.google.as_ref() else {
            return Ok(redirect_error(LOGIN_PAGE, "Google sign-in is not available"));
        };
        let state = Uuid::new_v4().simple().to_string();
        let url = google.authorize_url(&state)?;
        let mut headers = HeaderMap::new();
        set_oauth_state_cookie(&mut headers, &state, resources.secure_cookies());
        Ok((headers, Redirect::to(&url)).into_response())
    }

    async fn complete_sign_in(
        resources: &Arc<ServerResources>,
        code: &str,
    ) -> AppResult<Response> {
        let google = resources
            .google
            .as_ref()
            .ok_or_else(|| AppError::config("Google sign-in is not configured"))?;
        let profile = google.fetch_profile(code).await?;
        let (account, token) = AuthService::new(resources.clone())
            .login_with_google(&profile)
            .await?;
        info!(account_id = account.account_id, "Signed in with Google");
        Ok(signed_in_redirect(
            resources,
            &token,
            &landing_path(account.role, None),
        ))
    }

    #[tracing::instrument(skip(resources, headers, query), fields(route = "google_callback"))]
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CallbackQuery>,
    ) -> PageResult<Response> {
        let secure = resources.secure_cookies();
        let cookie_state = get_cookie_value(&headers, OAUTH_STATE_COOKIE);

        let mut response = if let Some(error) = query.error.as_deref() {
            info!(error, "Google sign-in cancelled");
            redirect_error(LOGIN_PAGE, "Google sign-in was cancelled")
        } else if !state_matches(cookie_state.as_deref(), query.state.as_deref()) {
            warn!("Google callback state mismatch");
            redirect_error(LOGIN_PAGE, "Sign-in session expired. Please try again.")
        } else if let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) {
            match Self::complete_sign_in(&resources, code).await {
                Ok(response) => response,
                Err(e) => redirect_on_error(LOGIN_PAGE, e)?,
            }
        } else {
            redirect_error(LOGIN_PAGE, "Google did not return an authorization code")
        };

        clear_cookie(response.headers_mut(), OAUTH_STATE_COOKIE, secure);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_matches() {
        assert!(state_matches(Some("abc123"), Some("abc123")));
        assert!(!state_matches(Some("abc123"), Some("abc124")));
        assert!(!state_matches(None, Some("abc123")));
        assert!(!state_matches(Some("abc123"), None));
        assert!(!state_matches(Some(""), Some("")));
    }
}
