// ABOUTME: Main library entry point for the Online Academy course marketplace
// ABOUTME: Server-rendered catalog, enrollment, learning progress, reviews and role-based areas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Online Academy
//!
//! An online course marketplace served as HTML pages with a small JSON
//! surface for in-page interactions.
//!
//! ## Features
//!
//! - **Catalog**: home sections, category pages, paginated listing and
//!   ranked full-text search over titles and descriptions
//! - **Accounts**: email registration confirmed by one-time codes, optional
//!   Google sign-in, signed session cookies
//! - **Learning**: enrollment, per-lecture completion with course progress,
//!   reviews with recomputed ratings, a personal watchlist
//! - **Instructor and admin areas**: course authoring, curriculum editing,
//!   category management, suspension and account provisioning
//!
//! ## Architecture
//!
//! - **Database**: `sqlx` over SQLite with embedded migrations; one
//!   `impl Database` block per entity
//! - **Routes**: one `XRoutes` struct per area, merged into a single axum router
//! - **Views**: plain functions returning escaped HTML strings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use online_academy::config::environment::ServerConfig;
//! use online_academy::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Online Academy configured with port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Sessions, passwords, one-time codes and role extractors
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// SQLite storage
pub mod database;

/// Error types and HTTP mapping
pub mod errors;

/// Outbound HTTP clients (mail, Google)
pub mod external;

/// Health checks
pub mod health;

/// Structured logging setup
pub mod logging;

/// Domain types
pub mod models;

/// Shared server state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Course search ranking
pub mod search;

/// Cookie handling
pub mod security;

/// Server assembly and lifecycle
pub mod server;

/// HTML rendering
pub mod views;
