// ABOUTME: Shared server resources and the HTTP serve loop
// ABOUTME: Assembles the router from route handlers and runs it on a TCP listener
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server assembly
//!
//! [`ServerResources`] bundles the collaborators every handler needs: the
//! repository, the link generator and the configuration. The resources are
//! shared behind one `Arc` so handlers never clone collaborators
//! individually.

use crate::{
    config::ServerConfig,
    database::CampRepository,
    links::LinkGenerator,
    middleware::setup_cors,
    routes::{CampsRoutes, HealthRoutes, TalksRoutes},
};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared resources for all route handlers
pub struct ServerResources {
    /// Repository collaborator for camps and talks
    pub repository: Arc<dyn CampRepository>,
    /// Location resolver for created resources
    pub links: LinkGenerator,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create server resources from the repository and configuration
    pub fn new(repository: Arc<dyn CampRepository>, config: ServerConfig) -> Self {
        Self {
            repository,
            links: LinkGenerator::new(),
            config: Arc::new(config),
        }
    }
}

/// The camps API server
pub struct CodecampServer {
    resources: Arc<ServerResources>,
}

impl CodecampServer {
    /// Create a new server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the full application router
    #[must_use]
    pub fn router(resources: Arc<ServerResources>) -> Router {
        let cors = setup_cors(&resources.config);

        Router::new()
            .merge(CampsRoutes::routes(resources.clone()))
            .merge(TalksRoutes::routes(resources.clone()))
            .merge(HealthRoutes::routes(resources))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Run the server on the given port until the task is cancelled
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self, port: u16) -> Result<()> {
        let app = Self::router(self.resources);

        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        info!("HTTP server listening on port {port}");

        axum::serve(listener, app).await?;
        Ok(())
    }
}
