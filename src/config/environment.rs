// ABOUTME: Environment-based server configuration with typed sections and defaults
// ABOUTME: Loads port, database, session secret, mail and OAuth settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::session;
use crate::errors::{AppError, AppResult};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local development (relaxed defaults)
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from an environment string, defaulting to development
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Whether this is a production deployment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
            Self::Testing => f.write_str("testing"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse from `LOG_FORMAT`, defaulting to pretty
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Database pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx `SQLite` URL
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// Acquire timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./data/academy.db".to_owned(),
            max_connections: 5,
            connect_timeout_ms: 8000,
        }
    }
}

/// Session signing settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 key for session tokens
    pub session_secret: String,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: session::DEV_SECRET.to_owned(),
            session_ttl_hours: session::TTL_HOURS,
        }
    }
}

/// Transactional mail provider
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct MailConfig {
    /// Provider endpoint receiving JSON POSTs
    pub api_url: Option<String>,
    /// Bearer key
    pub api_key: Option<String>,
    /// Sender address
    pub from: String,
}

impl MailConfig {
    /// Whether an HTTP provider is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .finish()
    }
}

/// Google sign-in credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Google OAuth client id
    pub google_client_id: Option<String>,
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
}

impl OAuthConfig {
    /// Whether Google sign-in can be offered
    #[must_use]
    pub const fn google_enabled(&self) -> bool {
        self.google_client_id.is_some() && self.google_client_secret.is_some()
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("google_client_id", &self.google_client_id)
            .field(
                "google_client_secret",
                &self.google_client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    pub http_port: u16,
    /// Public base URL (cookie `Secure` flag, OAuth redirect)
    pub base_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Session settings
    pub auth: AuthConfig,
    /// Mail provider
    pub mail: MailConfig,
    /// Google sign-in
    pub oauth: OAuthConfig,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            environment: Environment::Development,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig {
                from: "no-reply@academy.local".to_owned(),
                ..MailConfig::default()
            },
            oauth: OAuthConfig::default(),
            request_timeout_secs: 30,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric variable does not parse
    /// - `SESSION_SECRET` is missing in production
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT")
            .map(|v| Environment::from_str_or_default(&v))
            .unwrap_or_default();

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => {
                return Err(AppError::config(
                    "SESSION_SECRET must be set in production",
                ));
            }
            _ => {
                warn!("SESSION_SECRET not set, using development secret");
                session::DEV_SECRET.to_owned()
            }
        };

        let config = Self {
            http_port: parse_env("HTTP_PORT", defaults.http_port)?,
            base_url: env::var("BASE_URL")
                .map(|v| v.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.base_url),
            environment,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_env(
                    "DB_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
                connect_timeout_ms: parse_env(
                    "DB_CONNECT_TIMEOUT_MS",
                    defaults.database.connect_timeout_ms,
                )?,
            },
            auth: AuthConfig {
                session_secret,
                session_ttl_hours: defaults.auth.session_ttl_hours,
            },
            mail: MailConfig {
                api_url: non_empty_env("MAIL_API_URL"),
                api_key: non_empty_env("MAIL_API_KEY"),
                from: env::var("MAIL_FROM").unwrap_or(defaults.mail.from),
            },
            oauth: OAuthConfig {
                google_client_id: non_empty_env("GOOGLE_CLIENT_ID"),
                google_client_secret: non_empty_env("GOOGLE_CLIENT_SECRET"),
            },
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::from_str_or_default(&v))
                .unwrap_or_default(),
        };

        Ok(config)
    }

    /// Whether cookies should carry the `Secure` flag
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Redirect URI registered with Google
    #[must_use]
    pub fn google_redirect_uri(&self) -> String {
        format!("{}/auth/google/callback", self.base_url)
    }

    /// One-line summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} env={} db={} mail={} google_oauth={}",
            self.http_port,
            self.environment,
            self.database.url,
            if self.mail.is_configured() { "http" } else { "log" },
            self.oauth.google_enabled()
        )
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 8] = [
        "HTTP_PORT",
        "DATABASE_URL",
        "SESSION_SECRET",
        "ENVIRONMENT",
        "BASE_URL",
        "MAIL_API_URL",
        "MAIL_API_KEY",
        "GOOGLE_CLIENT_ID",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.database.url, "sqlite:./data/academy.db");
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.mail.is_configured());
        assert!(!config.oauth.google_enabled());
        assert!(!config.secure_cookies());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("HTTP_PORT", "8081");
        env::set_var("BASE_URL", "https://academy.example.com/");
        env::set_var("MAIL_API_URL", "https://mail.example.com/send");
        env::set_var("MAIL_API_KEY", "key");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 8081);
        assert_eq!(config.base_url, "https://academy.example.com");
        assert!(config.secure_cookies());
        assert!(config.mail.is_configured());
        assert_eq!(
            config.google_redirect_uri(),
            "https://academy.example.com/auth/google/callback"
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        clear_env();
        env::set_var("HTTP_PORT", "not-a-port");
        assert!(ServerConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_secret() {
        clear_env();
        env::set_var("ENVIRONMENT", "production");
        assert!(ServerConfig::from_env().is_err());
        env::set_var("SESSION_SECRET", "a-real-secret");
        assert!(ServerConfig::from_env().is_ok());
        clear_env();
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = ServerConfig::default();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(session::DEV_SECRET));
    }
}
