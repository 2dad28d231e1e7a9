// ABOUTME: Admin category handlers: list with statistics, create, rename, delete
// ABOUTME: Deleting a category that still has courses or subcategories is refused with a banner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::auth::extractors::RequireAdmin;
use crate::errors::{AppError, PageResult};
use crate::resources::ServerResources;
use crate::routes::{redirect_notice, redirect_on_error};
use crate::views::{self, Flash};

const PAGE: &str = "/admin/categories";

/// Create or rename form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CategoryForm {
    /// Category name
    name: String,
    /// Parent id, empty for a top-level category
    parent_id: String,
}

impl CategoryForm {
    fn parent(&self) -> Result<Option<i64>, AppError> {
        match self.parent_id.trim() {
            "" => Ok(None),
            raw => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| AppError::invalid_input("Unknown parent category")),
        }
    }
}

/// Category list
pub(super) async fn handle_list(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(admin): RequireAdmin,
    Query(flash): Query<Flash>,
) -> PageResult<Response> {
    let stats = resources.database.list_category_stats().await?;
    let parents: Vec<_> = resources
        .database
        .list_categories()
        .await?
        .into_iter()
        .filter(|c| c.is_top_level())
        .collect();
    Ok(Html(views::admin::categories_page(&admin, &stats, &parents, &flash)).into_response())
}

/// Create a category
#[tracing::instrument(skip(resources, _admin, form), fields(route = "admin_create_category"))]
pub(super) async fn handle_create(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> PageResult<Response> {
    let created = match form.parent() {
        Ok(parent_id) => resources.database.create_category(&form.name, parent_id).await,
        Err(e) => Err(e),
    };
    match created {
        Ok(category) => {
            info!(category_id = category.category_id, "Category created");
            Ok(redirect_notice(
                PAGE,
                &format!("Category \"{}\" created", category.name),
            ))
        }
        Err(e) => redirect_on_error(PAGE, e),
    }
}

/// Rename a category
#[tracing::instrument(skip(resources, _admin, form), fields(route = "admin_rename_category"))]
pub(super) async fn handle_rename(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(_admin): RequireAdmin,
    Path(category_id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> PageResult<Response> {
    match resources
        .database
        .rename_category(category_id, &form.name)
        .await
    {
        Ok(()) => Ok(redirect_notice(PAGE, "Category renamed")),
        Err(e) => redirect_on_error(PAGE, e),
    }
}

/// Delete an unused category
#[tracing::instrument(skip(resources, _admin), fields(route = "admin_delete_category"))]
pub(super) async fn handle_delete(
    State(resources): State<Arc<ServerResources>>,
    RequireAdmin(_admin): RequireAdmin,
    Path(category_id): Path<i64>,
) -> PageResult<Response> {
    match resources.database.delete_category(category_id).await {
        Ok(()) => {
            info!(category_id, "Category deleted");
            Ok(redirect_notice(PAGE, "Category deleted"))
        }
        Err(e) => redirect_on_error(PAGE, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_parsing() {
        let mut form = CategoryForm::default();
        assert_eq!(form.parent().unwrap(), None);
        form.parent_id = " 4 ".to_owned();
        assert_eq!(form.parent().unwrap(), Some(4));
        form.parent_id = "web".to_owned();
        assert!(form.parent().is_err());
    }
}
