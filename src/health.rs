// ABOUTME: Server health reporting for load balancers and operators
// ABOUTME: Reports service identity, uptime and database reachability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! Health check endpoints and monitoring utilities

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::constants::service;
use crate::database::Database;

/// Overall health status
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems failing, service may be unavailable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service information
    pub service: ServiceInfo,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// Response timestamp
    pub timestamp: u64,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Environment (development, production, testing)
    pub environment: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Individual component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Status description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Health checker
pub struct HealthChecker {
    start_time: Instant,
    environment: String,
}

impl HealthChecker {
    /// Create a checker; uptime counts from now
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            environment: environment.into(),
        }
    }

    /// Check every component
    pub async fn check(&self, database: &Database) -> HealthResponse {
        let start = Instant::now();
        let checks = vec![Self::check_database(database).await];

        let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        HealthResponse {
            status,
            service: ServiceInfo {
                name: service::SERVICE_NAME.into(),
                version: service::VERSION.to_owned(),
                environment: self.environment.clone(),
                uptime_seconds: self.start_time.elapsed().as_secs(),
            },
            checks,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            response_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    async fn check_database(database: &Database) -> ComponentHealth {
        let start = Instant::now();

        match database.ping().await {
            Ok(()) => ComponentHealth {
                name: "database".into(),
                status: HealthStatus::Healthy,
                message: "Database is accessible and responsive".into(),
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
            Err(e) => {
                error!("Database health check failed: {}", e);
                ComponentHealth {
                    name: "database".into(),
                    status: HealthStatus::Unhealthy,
                    message: format!("Database check failed: {e}"),
                    duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                }
            }
        }
    }
}
