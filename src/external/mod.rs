// ABOUTME: Clients for third-party services called by the server
// ABOUTME: Transactional mail and Google OAuth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Transactional email
pub mod mail_client;
/// Google sign-in
#[cfg(feature = "oauth")]
pub mod oauth_client;

pub use mail_client::{mailer_from_config, LogMailer, MailMessage, Mailer};
#[cfg(feature = "oauth")]
pub use oauth_client::{GoogleOAuthClient, GoogleProfile};
