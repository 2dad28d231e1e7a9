// ABOUTME: Shared server state handed to every route via axum State
// ABOUTME: Bundles the database, configuration, session signer, mailer and OAuth client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use crate::auth::session::SessionManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
#[cfg(feature = "oauth")]
use crate::external::GoogleOAuthClient;
use crate::external::{mailer_from_config, Mailer};
use crate::health::HealthChecker;

/// Resources shared by all request handlers
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Session token signer
    pub sessions: SessionManager,
    /// Outbound email
    pub mailer: Arc<dyn Mailer>,
    /// Google sign-in, when configured
    #[cfg(feature = "oauth")]
    pub google: Option<GoogleOAuthClient>,
    /// Health reporting
    pub health: HealthChecker,
}

impl ServerResources {
    /// Build resources from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an outbound HTTP client cannot be built
    pub fn new(database: Database, config: Arc<ServerConfig>) -> AppResult<Self> {
        let mailer = mailer_from_config(&config.mail)?;
        Self::with_mailer(database, config, mailer)
    }

    /// Build resources with an explicit mailer
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth client cannot be built
    pub fn with_mailer(
        database: Database,
        config: Arc<ServerConfig>,
        mailer: Arc<dyn Mailer>,
    ) -> AppResult<Self> {
        Ok(Self {
            database,
            sessions: SessionManager::new(
                &config.auth.session_secret,
                config.auth.session_ttl_hours,
            ),
            mailer,
            #[cfg(feature = "oauth")]
            google: GoogleOAuthClient::from_config(&config)?,
            health: HealthChecker::new(config.environment.to_string()),
            config,
        })
    }

    /// Whether cookies carry the `Secure` flag
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.config.secure_cookies()
    }
}
