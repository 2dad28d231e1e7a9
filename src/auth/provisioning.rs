// ABOUTME: Creates pre-verified accounts on behalf of an operator (admin form, CLI, demo seeding)
// ABOUTME: Applies the same name, email and password rules as self-service registration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use tracing::info;

use super::password::{hash_password, validate_password};
use super::validation::{is_valid_email, validate_full_name};
use crate::database::accounts::{normalize_email, NewAccount};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Account, AuthProvider, Role};

/// Operator-supplied account details
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    /// Display name
    pub full_name: String,
    /// Login email
    pub email: String,
    /// Initial password
    pub password: String,
    /// Instructor bio; ignored for other roles
    pub bio: Option<String>,
}

/// Validate, hash and store a verified account of the given role
///
/// # Errors
///
/// Returns `InvalidInput` for bad fields, `ResourceAlreadyExists` for a taken
/// email, or a storage error
pub async fn provision_account(
    database: &Database,
    role: Role,
    request: &ProvisionRequest,
) -> AppResult<Account> {
    let full_name = request.full_name.trim();
    validate_full_name(full_name)?;
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(AppError::invalid_input("Please enter a valid email address"));
    }
    validate_password(&request.password)?;

    let account = NewAccount {
        email,
        password_hash: hash_password(&request.password).await?,
        full_name: full_name.to_owned(),
        is_verified: true,
        avatar_url: None,
        auth_provider: AuthProvider::Email,
    };
    let bio = request
        .bio
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());

    let created = match role {
        Role::Student => database.create_student_account(&account).await?,
        Role::Instructor => database.create_instructor_account(&account, bio).await?,
        Role::Admin => database.create_admin_account(&account).await?,
    };
    info!(
        account_id = created.account_id,
        role = role.as_str(),
        "Provisioned account"
    );
    Ok(created)
}
