// ABOUTME: Outbound email for one-time verification codes
// ABOUTME: HTTP transactional-mail client plus a log-only fallback for development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Transactional mail
//!
//! When `MAIL_API_URL` and `MAIL_API_KEY` are configured, messages are sent as
//! a JSON POST with a bearer key:
//!
//! ```json
//! { "from": "...", "to": "...", "subject": "...", "text": "...", "html": "..." }
//! ```
//!
//! Otherwise codes are written to the log so local development works without
//! a provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::constants::{otp, service};
use crate::errors::{AppError, AppResult};
use crate::models::OtpPurpose;

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// HTML body
    pub html: String,
}

impl MailMessage {
    /// Verification code email for registration or an email change
    #[must_use]
    pub fn otp(to: &str, name: &str, code: &str, purpose: OtpPurpose) -> Self {
        let action = match purpose {
            OtpPurpose::Register => "finish creating your account",
            OtpPurpose::EmailChange => "confirm your new email address",
        };
        let subject = format!("{} verification code: {code}", service::SITE_NAME);
        let text = format!(
            "Hi {name},\n\nUse the code {code} to {action}. It expires in {} minutes.\n\n\
             If you did not request this, you can ignore this email.\n",
            otp::TTL_MINUTES
        );
        let html = format!(
            "<p>Hi {},</p><p>Use the code <strong style=\"font-size:20px;letter-spacing:4px\">{code}</strong> \
             to {action}. It expires in {} minutes.</p>\
             <p>If you did not request this, you can ignore this email.</p>",
            html_escape::encode_text(name),
            otp::TTL_MINUTES
        );
        Self {
            to: to.to_owned(),
            subject,
            text,
            html,
        }
    }
}

/// Delivers email
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Mailer backed by an HTTP transactional-mail API
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    /// Create a client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_url: &str, api_key: &str, from: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build mail client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.to_owned(),
            api_key: api_key.to_owned(),
            from: from.to_owned(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[tracing::instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        let body = SendRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external_service("mail", format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "Mail provider rejected message");
            return Err(AppError::external_service(
                "mail",
                format!("Provider returned {status}: {detail}"),
            ));
        }

        info!("Email sent");
        Ok(())
    }
}

/// Mailer that only logs messages
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Mail provider not configured, email logged instead:\n{}",
            message.text
        );
        Ok(())
    }
}

/// Pick the mailer for a configuration
///
/// # Errors
///
/// Returns an error if the HTTP mailer cannot be built
pub fn mailer_from_config(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    match (&config.api_url, &config.api_key) {
        (Some(url), Some(key)) => Ok(Arc::new(HttpMailer::new(url, key, &config.from)?)),
        _ => Ok(Arc::new(LogMailer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_message_contents() {
        let message = MailMessage::otp("a@b.io", "<Lan>", "042917", OtpPurpose::Register);
        assert_eq!(message.to, "a@b.io");
        assert!(message.subject.contains("042917"));
        assert!(message.text.contains("042917"));
        assert!(message.html.contains("&lt;Lan&gt;"));
        assert!(message.text.contains("5 minutes"));
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let message = MailMessage::otp("a@b.io", "Lan", "000000", OtpPurpose::EmailChange);
        assert!(LogMailer.send(&message).await.is_ok());
    }

    #[test]
    fn test_unconfigured_mail_falls_back_to_log() {
        assert!(mailer_from_config(&MailConfig::default()).is_ok());
    }
}
