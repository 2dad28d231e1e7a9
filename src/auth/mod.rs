// ABOUTME: Authentication building blocks: password hashing, session tokens and role extractors
// ABOUTME: Route handlers combine these; nothing here touches HTTP bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Role-gated axum extractors
pub mod extractors;
/// bcrypt hashing and one-time codes
pub mod password;
/// Operator-created accounts
pub mod provisioning;
/// Signed session cookies
pub mod session;
/// Email and name checks
pub mod validation;

pub use extractors::{
    ApiStudent, MaybeUser, RequireAdmin, RequireInstructor, RequireStudent, RequireUser,
};
pub use session::{SessionManager, SessionUser};
