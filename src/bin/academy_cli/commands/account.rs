// ABOUTME: Account commands for academy-cli: create staff or student accounts, list users
// ABOUTME: Accounts created here are pre-verified and can log in immediately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use clap::{Subcommand, ValueEnum};
use tracing::info;

use online_academy::auth::password::{hash_password, validate_password};
use online_academy::auth::provisioning::{provision_account, ProvisionRequest};
use online_academy::database::Database;
use online_academy::errors::{AppError, AppResult};
use online_academy::models::Role;

/// Role accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    /// Learner
    Student,
    /// Course author
    Instructor,
    /// Site administrator
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Student => Self::Student,
            RoleArg::Instructor => Self::Instructor,
            RoleArg::Admin => Self::Admin,
        }
    }
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create a verified account
    Create {
        /// Account role
        #[arg(long, value_enum, default_value = "admin")]
        role: RoleArg,
        /// Login email
        #[arg(long)]
        email: String,
        /// Initial password
        #[arg(long)]
        password: String,
        /// Display name (defaults to the email's local part)
        #[arg(long)]
        name: Option<String>,
        /// Instructor bio
        #[arg(long)]
        bio: Option<String>,
        /// Reset the password if the email is already registered
        #[arg(long)]
        force: bool,
    },
    /// List accounts of a role
    List {
        /// Account role
        #[arg(long, value_enum, default_value = "instructor")]
        role: RoleArg,
    },
}

pub async fn run(database: &Database, command: AccountCommand) -> AppResult<()> {
    match command {
        AccountCommand::Create {
            role,
            email,
            password,
            name,
            bio,
            force,
        } => {
            if let Some(existing) = database.get_account_by_email(&email).await? {
                if !force {
                    return Err(AppError::already_exists(format!(
                        "{} is already registered (use --force to reset its password)",
                        existing.email
                    )));
                }
                validate_password(&password)?;
                let hash = hash_password(&password).await?;
                database.update_password_hash(existing.account_id, &hash).await?;
                info!(account_id = existing.account_id, "Password reset from CLI");
                println!("Password reset for {} ({})", existing.email, existing.role.as_str());
                return Ok(());
            }

            let full_name = name.unwrap_or_else(|| {
                email
                    .split('@')
                    .next()
                    .unwrap_or("Administrator")
                    .to_owned()
            });
            let request = ProvisionRequest {
                full_name,
                email,
                password,
                bio,
            };
            let account = provision_account(database, role.into(), &request).await?;
            println!(
                "Created {} account #{} for {}",
                account.role.as_str(),
                account.account_id,
                account.email
            );
            Ok(())
        }
        AccountCommand::List { role } => {
            let users = database.list_users(role.into()).await?;
            if users.is_empty() {
                println!("No accounts");
            }
            for user in users {
                println!(
                    "#{:<5} {:<32} {:<24} verified={} courses={}",
                    user.account_id, user.email, user.full_name, user.is_verified, user.course_count
                );
            }
            Ok(())
        }
    }
}
