// ABOUTME: Server-side HTML rendering, one module per area of the site
// ABOUTME: All interpolated text goes through the escaping helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Admin area
pub mod admin;
/// `/static/app.js`
pub mod assets;
/// Registration, verification and login
pub mod auth;
/// Home, listings, category and search pages
pub mod catalog;
/// Course detail page
pub mod course;
/// Formatting and escaping
pub mod helpers;
/// Instructor area
pub mod instructor;
/// Page shell and error page
pub mod layout;
/// Learning page
pub mod learn;
/// Student profile pages
pub mod profile;

pub use layout::Flash;
