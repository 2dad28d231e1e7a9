// ABOUTME: Tracing subscriber setup for the academy binaries
// ABOUTME: Chooses pretty or JSON output and honours RUST_LOG through EnvFilter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;
use crate::errors::{AppError, AppResult};

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to this crate
/// and `warn` to dependencies.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(format: LogFormat, default_level: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,online_academy={default_level},academy_server={default_level},tower_http={default_level}"
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
    };

    result.map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))
}
