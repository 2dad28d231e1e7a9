// ABOUTME: Configuration module root for the academy server
// ABOUTME: Re-exports the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Environment-variable configuration
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, Environment, LogFormat, MailConfig, OAuthConfig, ServerConfig,
};
