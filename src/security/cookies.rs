// ABOUTME: Secure HTTP cookie utilities for the session and OAuth state cookies
// ABOUTME: Provides httpOnly, Secure, SameSite cookie helpers to prevent XSS and CSRF attacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Secure cookie utilities
//!
//! The `Secure` flag follows the configured base URL: `https://` deployments
//! get `Secure` cookies, plain-HTTP development does not.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::constants::session;

/// Cookie security configuration
pub struct SecureCookieConfig {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Max-Age in seconds
    pub max_age_secs: i64,
    /// `HttpOnly` flag (prevents JavaScript access)
    pub http_only: bool,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// `SameSite` policy
    pub same_site: SameSitePolicy,
    /// Cookie path
    pub path: String,
}

/// `SameSite` cookie policy
#[derive(Debug, Clone, Copy)]
pub enum SameSitePolicy {
    /// Strict: Cookie only sent in first-party context
    Strict,
    /// Lax: Cookie sent on top-level navigation
    Lax,
}

impl SecureCookieConfig {
    /// `HttpOnly`, `SameSite=Lax` cookie on `/`
    #[must_use]
    pub fn new(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_owned(),
            max_age_secs,
            http_only: true,
            secure,
            same_site: SameSitePolicy::Lax,
            path: "/".to_owned(),
        }
    }

    /// Build the Set-Cookie header value
    #[must_use]
    pub fn build(&self) -> String {
        use std::fmt::Write;
        let mut cookie = format!("{}={}", self.name, self.value);

        let _ = write!(cookie, "; Max-Age={}", self.max_age_secs);
        let _ = write!(cookie, "; Path={}", self.path);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }

        match self.same_site {
            SameSitePolicy::Strict => cookie.push_str("; SameSite=Strict"),
            SameSitePolicy::Lax => cookie.push_str("; SameSite=Lax"),
        }

        cookie
    }

    fn append_to(&self, headers: &mut HeaderMap) {
        if let Ok(header_value) = HeaderValue::from_str(&self.build()) {
            headers.append(header::SET_COOKIE, header_value);
        }
    }
}

/// Set the session cookie carrying the signed session token
pub fn set_session_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: i64, secure: bool) {
    SecureCookieConfig::new(session::COOKIE_NAME, token, max_age_secs, secure).append_to(headers);
}

/// Clear the session cookie
pub fn clear_session_cookie(headers: &mut HeaderMap, secure: bool) {
    clear_cookie(headers, session::COOKIE_NAME, secure);
}

/// Set the short-lived OAuth CSRF state cookie
pub fn set_oauth_state_cookie(headers: &mut HeaderMap, state: &str, secure: bool) {
    SecureCookieConfig::new(
        session::OAUTH_STATE_COOKIE,
        state,
        session::OAUTH_STATE_TTL_SECS,
        secure,
    )
    .append_to(headers);
}

/// Expire a cookie immediately
pub fn clear_cookie(headers: &mut HeaderMap, name: &str, secure: bool) {
    SecureCookieConfig::new(name, "", 0, secure).append_to(headers);
}

/// Extract cookie value from request headers
///
/// # Arguments
/// * `headers` - Request headers
/// * `cookie_name` - Name of cookie to extract
///
/// # Returns
/// Cookie value if found, None otherwise
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();

            if name == cookie_name && !value.is_empty() {
                Some(value.to_owned())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_flags() {
        let mut headers = HeaderMap::new();
        set_session_cookie(&mut headers, "abc.def", 86_400, true);
        let value = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(
            value,
            "session=abc.def; Max-Age=86400; Path=/; HttpOnly; Secure; SameSite=Lax"
        );
    }

    #[test]
    fn test_clear_cookie_expires() {
        let mut headers = HeaderMap::new();
        clear_session_cookie(&mut headers, false);
        let value = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.starts_with("session=; Max-Age=0"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn test_multiple_cookies_are_appended() {
        let mut headers = HeaderMap::new();
        set_session_cookie(&mut headers, "t", 10, false);
        clear_cookie(&mut headers, session::OAUTH_STATE_COOKIE, false);
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn test_get_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=tok123; empty="),
        );
        assert_eq!(get_cookie_value(&headers, "session").as_deref(), Some("tok123"));
        assert_eq!(get_cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert!(get_cookie_value(&headers, "empty").is_none());
        assert!(get_cookie_value(&headers, "missing").is_none());
    }
}
