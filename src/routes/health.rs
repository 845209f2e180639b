// ABOUTME: Health check endpoint for operational visibility
// ABOUTME: Reports service status and database connectivity
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health check route

use crate::{errors::AppError, server::ServerResources};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check response body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status ("healthy" or "degraded")
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Whether the database answered a ping
    pub database: bool,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /health
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let database = resources.repository.ping().await.is_ok();

        let response = HealthResponse {
            status: if database { "healthy" } else { "degraded" }.to_owned(),
            service: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database,
        };

        let status = if database {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        Ok((status, Json(response)).into_response())
    }
}
