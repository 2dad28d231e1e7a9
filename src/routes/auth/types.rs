// ABOUTME: Form and query types for the authentication routes
// ABOUTME: Deserialized from urlencoded bodies posted by the server-rendered forms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Authentication request types
//!
//! Forms arrive as `application/x-www-form-urlencoded`; missing fields
//! default to empty strings so validation can report them by name.

use serde::Deserialize;

use crate::models::Account;

/// Sign-up form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Display name
    pub full_name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password repeated
    pub confirm_password: String,
}

/// Code submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyForm {
    /// Account email
    pub email: String,
    /// Six-digit code
    pub code: String,
}

/// Resend request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResendForm {
    /// Account email
    pub email: String,
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Account email
    pub email: String,
    /// Password
    pub password: String,
    /// Page to return to after login
    pub return_to: Option<String>,
}

/// Query parameters of the login and verify pages
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthPageQuery {
    /// Prefilled email
    pub email: Option<String>,
    /// Page to return to after login
    pub return_to: Option<String>,
    /// Success banner
    pub notice: Option<String>,
    /// Error banner
    pub error: Option<String>,
}

/// Result of a password login
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials accepted; carries the signed session token
    SignedIn {
        /// The account
        account: Account,
        /// Session token for the cookie
        token: String,
    },
    /// Credentials accepted but the email is unverified; a fresh code was sent
    NeedsVerification {
        /// The account
        account: Account,
    },
}

/// Keep only local absolute paths so `return_to` cannot redirect off-site
#[must_use]
pub fn safe_return_to(path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') {
        Some(path.to_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/learn/3")).as_deref(), Some("/learn/3"));
        assert_eq!(safe_return_to(Some("//evil.example")), None);
        assert_eq!(safe_return_to(Some("https://evil.example")), None);
        assert_eq!(safe_return_to(Some("/\\evil.example")), None);
        assert_eq!(safe_return_to(None), None);
    }

    #[test]
    fn test_login_form_defaults_missing_fields() {
        let form: LoginForm = serde_urlencoded::from_str("email=a%40b.io").unwrap();
        assert_eq!(form.email, "a@b.io");
        assert!(form.password.is_empty());
        assert!(form.return_to.is_none());
    }
}
