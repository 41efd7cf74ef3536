//! seo-mcp server entry point.
//!
//! Boots the MCP server on stdio (default) or on the streamable HTTP
//! transport, as selected by `SEO_MCP_TRANSPORT`.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use seo_mcp_core::{AppConfig, Transport};
use tracing_subscriber::EnvFilter;

mod handler;
mod services;
mod tools;

use handler::SeoMcpServer;
use services::Services;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let services = Arc::new(Services::from_config(&config)?);

    match config.transport {
        Transport::Stdio => serve_stdio(services).await,
        Transport::Http => serve_http(services, &config.http_bind).await,
    }
}

async fn serve_stdio(services: Arc<Services>) -> Result<()> {
    tracing::info!("Starting seo-mcp server on stdio transport");

    let server = serve_server(SeoMcpServer::new(services), stdio()).await?;
    server.waiting().await?;

    Ok(())
}

async fn serve_http(services: Arc<Services>, bind: &str) -> Result<()> {
    let mcp = StreamableHttpService::new(
        move || Ok(SeoMcpServer::new(services.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let app = axum::Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest_service("/mcp", mcp);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(bind, "Starting seo-mcp server on streamable HTTP transport at /mcp");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("failed to listen for ctrl-c: {}", e);
            }
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"status": "healthy", "service": "seo-mcp", "version": env!("CARGO_PKG_VERSION")}))
}
