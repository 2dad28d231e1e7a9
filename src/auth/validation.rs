// ABOUTME: Shape checks for account fields shared by registration, profile edits and provisioning
// ABOUTME: Pure functions with no storage or HTTP dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use crate::constants::accounts;
use crate::errors::{AppError, AppResult};

/// Minimal shape check: one `@`, a non-empty local part and a dotted domain
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Validate a display name
///
/// # Errors
///
/// Returns `InvalidInput` for empty or overlong names
pub fn validate_full_name(full_name: &str) -> AppResult<()> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Full name is required"));
    }
    if trimmed.chars().count() > accounts::MAX_NAME_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Full name must be at most {} characters",
            accounts::MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("lan@example.com"));
        assert!(!is_valid_email("lan@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("lan@@example.com"));
        assert!(!is_valid_email("lan example@x.io"));
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("  ").is_err());
        assert!(validate_full_name(&"a".repeat(101)).is_err());
        assert!(validate_full_name("Lan").is_ok());
    }
}
