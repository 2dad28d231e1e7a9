// ABOUTME: Category commands for academy-cli: list the tree, create, rename and delete
// ABOUTME: Parents are referenced by name; only top-level categories can have children
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use clap::Subcommand;

use online_academy::database::Database;
use online_academy::errors::{AppError, AppResult};

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Print the category tree
    List,
    /// Create a category
    Create {
        /// Category name
        name: String,
        /// Parent category name
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename a category
    Rename {
        /// Category id
        id: i64,
        /// New name
        name: String,
    },
    /// Delete a category without courses or subcategories
    Delete {
        /// Category id
        id: i64,
    },
}

pub async fn run(database: &Database, command: CategoryCommand) -> AppResult<()> {
    match command {
        CategoryCommand::List => {
            for node in database.category_tree().await? {
                println!("#{:<4} {}", node.category.category_id, node.category.name);
                for child in node.children {
                    println!("  #{:<4} {}", child.category_id, child.name);
                }
            }
        }
        CategoryCommand::Create { name, parent } => {
            let parent_id = match parent {
                Some(parent) => Some(
                    database
                        .get_category_by_name(&parent)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("Category {parent}")))?
                        .category_id,
                ),
                None => None,
            };
            let category = database.create_category(&name, parent_id).await?;
            println!("Created category #{} {}", category.category_id, category.name);
        }
        CategoryCommand::Rename { id, name } => {
            database.rename_category(id, &name).await?;
            println!("Renamed category #{id}");
        }
        CategoryCommand::Delete { id } => {
            database.delete_category(id).await?;
            println!("Deleted category #{id}");
        }
    }
    Ok(())
}
