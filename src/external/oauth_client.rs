// ABOUTME: Google OAuth 2.0 client for "Sign in with Google"
// ABOUTME: Builds the consent URL, exchanges the authorization code and fetches the profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

/// Profile returned by the userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    /// Stable Google account id
    pub sub: String,
    /// Primary email
    pub email: String,
    /// Whether Google verified the email
    #[serde(default)]
    pub email_verified: bool,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth client
#[derive(Clone)]
pub struct GoogleOAuthClient {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleOAuthClient {
    /// Build a client when credentials are configured
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &ServerConfig) -> AppResult<Option<Self>> {
        let (Some(client_id), Some(client_secret)) = (
            config.oauth.google_client_id.as_ref(),
            config.oauth.google_client_secret.as_ref(),
        ) else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build OAuth client: {e}")))?;

        Ok(Some(Self {
            client,
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
            redirect_uri: config.google_redirect_uri(),
        }))
    }

    /// Consent page URL carrying the CSRF `state`
    ///
    /// # Errors
    ///
    /// Returns an error if the authorize URL cannot be parsed
    pub fn authorize_url(&self, state: &str) -> AppResult<String> {
        let mut url = Url::parse(AUTHORIZE_URL)
            .map_err(|e| AppError::internal(format!("Invalid authorize URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .append_pair("prompt", "select_account");
        Ok(url.into())
    }

    /// Exchange an authorization code and fetch the signed-in profile
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` if Google rejects the code or the
    /// profile cannot be fetched
    #[tracing::instrument(skip(self, code))]
    pub async fn fetch_profile(&self, code: &str) -> AppResult<GoogleProfile> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.client.post(TOKEN_URL).form(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Google token exchange failed");
            return Err(AppError::external_service(
                "google",
                format!("Token exchange returned {status}"),
            ));
        }
        let token: TokenResponse = response.json().await?;

        let profile: GoogleProfile = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(email_verified = profile.email_verified, "Fetched Google profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OAuthConfig;

    fn config_with_google() -> ServerConfig {
        ServerConfig {
            oauth: OAuthConfig {
                google_client_id: Some("client-123".to_owned()),
                google_client_secret: Some("secret".to_owned()),
            },
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_disabled_without_credentials() {
        let client = GoogleOAuthClient::from_config(&ServerConfig::default()).unwrap();
        assert!(client.is_none());
    }

    #[test]
    fn test_authorize_url_carries_state_and_redirect() {
        let client = GoogleOAuthClient::from_config(&config_with_google())
            .unwrap()
            .unwrap();
        let url = Url::parse(&client.authorize_url("state-xyz").unwrap()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("state".to_owned(), "state-xyz".to_owned())));
        assert!(pairs.contains(&("client_id".to_owned(), "client-123".to_owned())));
        assert!(pairs.contains(&(
            "redirect_uri".to_owned(),
            "http://localhost:3000/auth/google/callback".to_owned()
        )));
    }
}
