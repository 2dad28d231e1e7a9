// ABOUTME: Search routes: the results page and the JSON endpoint used for in-page paging
// ABOUTME: Both run the same ranking so page links and script paging agree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::auth::extractors::MaybeUser;
use crate::errors::{AppError, PageResult};
use crate::resources::ServerResources;
use crate::search::{search_courses, SearchQuery};
use crate::views;

/// Raw `?q=&page=&sort=` parameters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Free-text query
    pub q: Option<String>,
    /// Page number; anything unparsable counts as 1
    pub page: Option<String>,
    /// Sort key
    pub sort: Option<String>,
}

impl SearchParams {
    /// Normalized query
    #[must_use]
    pub fn to_query(&self) -> SearchQuery {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok());
        SearchQuery::new(self.q.as_deref(), page, self.sort.as_deref())
    }
}

/// Search routes
pub struct SearchRoutes;

impl SearchRoutes {
    /// Create search routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/search", get(Self::handle_api))
            .route("/search", get(Self::handle_page))
            .with_state(resources)
    }

    async fn handle_api(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<SearchParams>,
    ) -> Result<Response, AppError> {
        let query = params.to_query();
        let results = search_courses(&resources.database, &query).await?;
        Ok(Json(results).into_response())
    }

    async fn handle_page(
        State(resources): State<Arc<ServerResources>>,
        MaybeUser(user): MaybeUser,
        Query(params): Query<SearchParams>,
    ) -> PageResult<Response> {
        let query = params.to_query();
        let results = search_courses(&resources.database, &query).await?;
        Ok(Html(views::catalog::search_page(user.as_ref(), &query, &results)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchSort;

    #[test]
    fn test_params_tolerate_garbage() {
        let params = SearchParams {
            q: Some("  rust ".to_owned()),
            page: Some("abc".to_owned()),
            sort: Some("cheapest".to_owned()),
        };
        let query = params.to_query();
        assert_eq!(query.q, "rust");
        assert_eq!(query.page, 1);
        assert_eq!(query.sort, SearchSort::RatingDesc);
    }
}
