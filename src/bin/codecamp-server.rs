// ABOUTME: Server binary for the camps REST API
// ABOUTME: Loads configuration, migrates the database and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Camps API Server Binary

use anyhow::Result;
use clap::Parser;
use codecamp_api::{
    config::ServerConfig,
    database::SqliteCampRepository,
    logging,
    server::{CodecampServer, ServerResources},
};
use std::sync::Arc;
use tracing::info;

/// Command-line arguments for the server binary
#[derive(Parser)]
#[command(name = "codecamp-server")]
#[command(about = "Camps REST API - CRUD endpoints for camps and talks")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment, then apply CLI overrides
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting camps API server");
    info!("{}", config.summary());

    let repository = SqliteCampRepository::new(&config.database.url).await?;
    repository.migrate().await?;
    info!("Database migrated: {}", config.database.url);

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(Arc::new(repository), config));

    display_available_endpoints(port);

    CodecampServer::new(resources).run(port).await
}

/// Display all available API endpoints at startup
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    info!("=== Available API Endpoints ===");
    info!("Camps:");
    info!("   List Camps:        GET    http://{host}:{port}/api/camps");
    info!("   Get Camp:          GET    http://{host}:{port}/api/camps/{{moniker}}");
    info!("   Search By Date:    GET    http://{host}:{port}/api/camps/search?theDate=YYYY-MM-DD");
    info!("   Create Camp:       POST   http://{host}:{port}/api/camps");
    info!("   Delete Camp:       DELETE http://{host}:{port}/api/camps/{{moniker}}");
    info!("Talks:");
    info!("   List Talks:        GET    http://{host}:{port}/api/camps/{{moniker}}/talks");
    info!("   Get Talk:          GET    http://{host}:{port}/api/camps/{{moniker}}/talks/{{id}}");
    info!("   Create Talk:       POST   http://{host}:{port}/api/camps/{{moniker}}/talks");
    info!("   Delete Talk:       DELETE http://{host}:{port}/api/camps/{{moniker}}/talks/{{id}}");
    info!("Monitoring:");
    info!("   Health Check:      GET    http://{host}:{port}/health");
    info!("=== End of Endpoint List ===");
}
