// ABOUTME: Health check route reporting database reachability and uptime
// ABOUTME: Returns 200 when healthy and 503 otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::health::HealthStatus;
use crate::resources::ServerResources;

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let report = resources.health.check(&resources.database).await;
        let status = if report.status == HealthStatus::Healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(report)).into_response()
    }
}
